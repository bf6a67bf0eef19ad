use chrono::Local;
use colored::Colorize;
use itertools::iproduct;
use std::error::Error;
use std::fs::File;
use tracing::Level;
use tsp_genetic::demo_data::{clustered_cities, random_cities};
use tsp_genetic::{solve, City, CrossoverKind, GaConfig};

#[derive(Debug)]
pub struct Scenario {
    name: &'static str,
    cities: Vec<City>,
}

#[derive(Debug)]
pub struct TestSchema {
    crossover: Vec<CrossoverKind>,
    mutation_rate: Vec<f64>,
    elitism: Vec<bool>,
}

const SEED: u64 = 42;

fn scenarios() -> Result<Vec<Scenario>, Box<dyn Error>> {
    Ok(vec![
        Scenario {
            name: "uniform-30",
            cities: random_cities(30, SEED),
        },
        Scenario {
            name: "clustered-60",
            cities: clustered_cities(60, 5, 25.0, SEED)?,
        },
    ])
}

fn run_schema(schema: &TestSchema, scenarios: &[Scenario], date_str: &str) -> Result<(), Box<dyn Error>> {
    for scenario in scenarios {
        for (&crossover, &mutation_rate, &elitism) in
            iproduct!(&schema.crossover, &schema.mutation_rate, &schema.elitism)
        {
            let config = GaConfig::default()
                .with_population_size(200)
                .with_max_epochs(400)
                .with_stagnation_limit(80)
                .with_mutation_rate(mutation_rate)
                .with_elitism(elitism)
                .with_crossover(crossover)
                .with_seed(SEED);

            let outcome = solve(&scenario.cities, &config)?;

            println!(
                "{} - {} crossover, mutation {:.2}, elitism {}: best distance {:.3} after {} epochs ({})",
                format!("Scenario {:>12}", scenario.name).bold().red(),
                crossover,
                mutation_rate,
                elitism,
                outcome.best_distance(),
                outcome.epochs,
                outcome.reason,
            );
            println!("Best tour: {:?}", outcome.best_genes());

            let filename = format!(
                "history_{}_{}_{}_{:.2}_{}.csv",
                date_str,
                scenario.name,
                format!("{:?}", crossover).to_lowercase(),
                mutation_rate,
                if elitism { "elitist" } else { "generational" },
            );
            outcome.history.write_csv(File::create(&filename)?)?;
            println!("History saved to {}", filename);
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let schema = TestSchema {
        crossover: vec![CrossoverKind::Order, CrossoverKind::PartiallyMapped],
        mutation_rate: vec![0.01, 0.05],
        elitism: vec![false, true],
    };

    let now = Local::now();
    let date_str = now.format("%Y-%m-%d_%H-%M-%S").to_string();

    run_schema(&schema, &scenarios()?, &date_str)
}
