use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use abcdcl::cdcl::{
    CdclError, DecideHeuristic, Literal, Model, RandomDecideHeuristic, RestartPolicy,
    SolveResult, Solver, SolverConfig,
};
use abcdcl::parser::{read_from_file, Cnf};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Heuristic {
    Vsids,
    Random,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Restart {
    Luby,
    Geometric,
}

/// Decide satisfiability of a DIMACS CNF formula.
#[derive(Parser, Debug)]
#[command(name = "abcdcl", version, long_about = None)]
struct Cli {
    /// DIMACS CNF file
    input: PathBuf,

    /// Verbosity level (-v, -vv, -vvv), logged to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decision heuristic
    #[arg(long, value_enum, default_value_t = Heuristic::Vsids)]
    heuristic: Heuristic,

    /// Restart schedule
    #[arg(long, value_enum, default_value_t = Restart::Luby)]
    restart: Restart,

    /// Conflicts in the first restart interval
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    restart_unit: u64,

    /// Give up after this many conflicts
    #[arg(long)]
    max_conflicts: Option<u64>,

    /// Seed for the random heuristic
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Literals assumed true for this run, in DIMACS notation
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    assume: Vec<i64>,
}

impl Cli {
    fn config(&self) -> SolverConfig {
        let restart = match self.restart {
            Restart::Luby => RestartPolicy::Luby {
                unit: self.restart_unit,
            },
            Restart::Geometric => RestartPolicy::Geometric {
                first: self.restart_unit,
                factor: 1.5,
            },
        };
        SolverConfig {
            restart,
            max_conflicts: self.max_conflicts,
            seed: self.seed,
            ..SolverConfig::default()
        }
    }
}

// Output follows the SAT competition conventions: an `s` status line, then
// for satisfiable formulas a `v` line listing every variable as a literal.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(SolveResult::Satisfiable(_)) => ExitCode::from(10),
        Ok(SolveResult::Unsatisfiable) => ExitCode::from(20),
        Ok(SolveResult::Interrupted) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("c error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<SolveResult> {
    let cnf = read_from_file(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    tracing::info!(
        vars = cnf.num_vars,
        clauses = cnf.clauses.len(),
        "loaded {}",
        cli.input.display()
    );

    let assumptions = cli
        .assume
        .iter()
        .map(|&v| Literal::from_dimacs(v).context("0 is not a literal"))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let config = cli.config();
    match cli.heuristic {
        Heuristic::Vsids => solve(Solver::with_config(cnf.num_vars, config), &cnf, &assumptions),
        Heuristic::Random => {
            let heuristic = RandomDecideHeuristic::new(config.seed);
            let solver = Solver::with_heuristic(cnf.num_vars, config, heuristic);
            solve(solver, &cnf, &assumptions)
        }
    }
}

fn solve<H: DecideHeuristic>(
    mut solver: Solver<H>,
    cnf: &Cnf,
    assumptions: &[Literal],
) -> anyhow::Result<SolveResult> {
    let start = Instant::now();
    for clause in &cnf.clauses {
        match solver.add_clause(clause.iter().copied()) {
            // the formula is contradictory; solve() reports it
            Ok(()) | Err(CdclError::EmptyClause) => {}
            Err(err) => return Err(err.into()),
        }
    }
    let result = solver.solve(assumptions)?;
    let elapsed = start.elapsed();
    if let SolveResult::Satisfiable(model) = &result {
        check_model(model, cnf)?;
    }

    let stats = solver.stats();
    println!(
        "c decisions {} propagations {} conflicts {} restarts {} learned {} deleted {}",
        stats.decisions,
        stats.propagations,
        stats.conflicts,
        stats.restarts,
        stats.learned_clauses,
        stats.deleted_clauses
    );
    println!("c solved in {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    match &result {
        SolveResult::Satisfiable(model) => {
            println!("s SATISFIABLE");
            println!("{model}");
        }
        SolveResult::Unsatisfiable => println!("s UNSATISFIABLE"),
        SolveResult::Interrupted => println!("s UNKNOWN"),
    }
    Ok(result)
}

/// Re-evaluates every input clause under `model`.
fn check_model(model: &Model, cnf: &Cnf) -> anyhow::Result<()> {
    if let Some(clause) = cnf.clauses.iter().find(|c| !model.satisfies_clause(c)) {
        let lits: Vec<String> = clause.iter().map(|l| l.to_string()).collect();
        bail!("model falsifies input clause [{}]", lits.join(" "));
    }
    tracing::debug!(clauses = cnf.clauses.len(), "model verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cnf(text: &str) -> Cnf {
        abcdcl::parser::read_from_string(text).unwrap()
    }

    #[test]
    fn check_model_accepts_a_satisfying_model() {
        let cnf = cnf("p cnf 2 2\n1 2 0\n-1 0\n");
        assert!(check_model(&Model::new(vec![false, true]), &cnf).is_ok());
    }

    #[test]
    fn check_model_names_the_falsified_clause() {
        let cnf = cnf("p cnf 2 2\n1 2 0\n-1 -2 0\n");
        let err = check_model(&Model::new(vec![true, true]), &cnf).unwrap_err();
        assert!(err.to_string().contains("[-1 -2]"));
    }

    #[test]
    fn solver_models_pass_the_check() {
        let cnf = cnf("p cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n");
        let solver = Solver::new(cnf.num_vars);
        let result = solve(solver, &cnf, &[]).unwrap();
        assert!(result.is_sat());
    }

    #[test]
    fn zero_restart_unit_is_rejected() {
        let parsed = Cli::try_parse_from(["abcdcl", "f.cnf", "--restart-unit", "0"]);
        assert!(parsed.is_err());
        let parsed = Cli::try_parse_from(["abcdcl", "f.cnf", "--restart-unit", "1"]);
        assert_eq!(parsed.unwrap().restart_unit, 1);
    }
}
