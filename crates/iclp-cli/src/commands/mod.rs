pub mod build;
pub mod report;

use std::fs;

use iclp_core::EngineConfig;
use iclp_search::{Engine, SplitPoint};
use tracing::info;

use crate::cli::{Commands, EngineArgs};
use crate::parser::Parser;
use build::{compile_script, resolve_vars};

fn load_engine(args: &EngineArgs) -> anyhow::Result<(Engine, Vec<(String, iclp_core::IntervalId)>)> {
    let src = fs::read_to_string(&args.script)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", args.script.display()))?;
    let stmts = Parser::parse_script(&src).map_err(|e| anyhow::anyhow!("parse error: {e}"))?;
    let (compiler, declared) = compile_script(&stmts)?;
    let config = EngineConfig::new()
        .with_throttle_threshold(args.throttle)
        .with_iteration_limit(args.iteration_limit)
        .with_precision(args.precision);
    let engine = Engine::from_compiler(compiler)?.with_config(config);
    info!(vars = declared.len(), "compiled script");
    Ok((engine, declared))
}

pub fn run(command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Absolve { engine: args } => {
            let (mut engine, declared) = load_engine(&args)?;
            let vars = resolve_vars(&args.vars, &declared)?;
            let mut ok = true;
            for &id in &vars {
                ok &= iclp_search::absolve(&mut engine, id, args.precision);
            }
            let assignment: iclp_search::Assignment = vars.iter().map(|&id| (id, engine.store.get(id))).collect();
            report::print_assignment(&declared, &assignment, json);
            if !ok {
                anyhow::bail!("inconsistent: propagation failed");
            }
            Ok(())
        }

        Commands::Solve { engine: args, limit, median } => {
            let (mut engine, declared) = load_engine(&args)?;
            let vars = resolve_vars(&args.vars, &declared)?;
            let strategy = if median { SplitPoint::Median } else { SplitPoint::Midpoint };
            let solutions = iclp_search::solve(&mut engine, &vars, args.precision, strategy, limit);
            report::print_solutions(&declared, &solutions, json);
            Ok(())
        }

        Commands::Splitsolve { engine: args, median } => {
            let (mut engine, declared) = load_engine(&args)?;
            let vars = resolve_vars(&args.vars, &declared)?;
            let strategy = if median { SplitPoint::Median } else { SplitPoint::Midpoint };
            let solution = iclp_search::splitsolve(&mut engine, &vars, args.precision, strategy);
            match solution {
                Some(assignment) => report::print_solutions(&declared, &[assignment], json),
                None => report::print_solutions(&declared, &[], json),
            }
            Ok(())
        }

        Commands::Enumerate { engine: args, limit } => {
            let (mut engine, declared) = load_engine(&args)?;
            let vars = resolve_vars(&args.vars, &declared)?;
            let solutions = iclp_search::enumerate(&mut engine, &vars, limit);
            report::print_solutions(&declared, &solutions, json);
            Ok(())
        }

        Commands::Minimize { engine: args, objective, median } => {
            let (mut engine, declared) = load_engine(&args)?;
            let vars = resolve_vars(&args.vars, &declared)?;
            let obj = resolve_vars(std::slice::from_ref(&objective), &declared)?[0];
            let strategy = if median { SplitPoint::Median } else { SplitPoint::Midpoint };
            match iclp_search::global_minimum(&mut engine, &vars, obj, args.precision, strategy) {
                Some((assignment, value)) => {
                    report::print_assignment(&declared, &assignment, json);
                    println!("minimum = {value}");
                }
                None => println!("no feasible solution"),
            }
            Ok(())
        }

        Commands::Maximize { engine: args, objective, median } => {
            let (mut engine, declared) = load_engine(&args)?;
            let vars = resolve_vars(&args.vars, &declared)?;
            let obj = resolve_vars(std::slice::from_ref(&objective), &declared)?[0];
            let strategy = if median { SplitPoint::Median } else { SplitPoint::Midpoint };
            match iclp_search::global_maximum(&mut engine, &vars, obj, args.precision, strategy) {
                Some((assignment, value)) => {
                    report::print_assignment(&declared, &assignment, json);
                    println!("maximum = {value}");
                }
                None => println!("no feasible solution"),
            }
            Ok(())
        }

        Commands::Stats { engine: args } => {
            let (mut engine, declared) = load_engine(&args)?;
            engine.propagate();
            let vars = resolve_vars(&args.vars, &declared)?;
            let assignment: iclp_search::Assignment = vars.iter().map(|&id| (id, engine.store.get(id))).collect();
            report::print_assignment(&declared, &assignment, json);
            report::print_stats(&engine.stats, json);
            Ok(())
        }
    }
}
