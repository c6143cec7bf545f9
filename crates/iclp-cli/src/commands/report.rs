//! Text/JSON rendering of variable enclosures and engine statistics
//! (spec §12: "prints resulting enclosures and `Stats` (JSON via
//! `--json`, following `gat-cli`'s `serde_json` use for machine-readable
//! output)").

use iclp_core::{IntervalId, Stats};
use iclp_search::Assignment;
use serde_json::json;

pub fn name_of<'a>(declared: &'a [(String, IntervalId)], id: IntervalId) -> &'a str {
    declared.iter().find(|(_, i)| *i == id).map(|(n, _)| n.as_str()).unwrap_or("?")
}

pub fn print_assignment(declared: &[(String, IntervalId)], assignment: &Assignment, json_mode: bool) {
    if json_mode {
        let obj: serde_json::Map<String, serde_json::Value> = assignment
            .iter()
            .map(|(id, iv)| {
                let (lo, hi) = iv.width_lo_hi();
                (name_of(declared, *id).to_string(), json!({"lo": lo, "hi": hi}))
            })
            .collect();
        println!("{}", serde_json::Value::Object(obj));
    } else {
        for (id, iv) in assignment {
            let (lo, hi) = iv.width_lo_hi();
            println!("{} = [{lo}, {hi}]", name_of(declared, *id));
        }
    }
}

pub fn print_solutions(declared: &[(String, IntervalId)], solutions: &[Assignment], json_mode: bool) {
    if json_mode {
        let list: Vec<serde_json::Value> = solutions
            .iter()
            .map(|assignment| {
                let obj: serde_json::Map<String, serde_json::Value> = assignment
                    .iter()
                    .map(|(id, iv)| {
                        let (lo, hi) = iv.width_lo_hi();
                        (name_of(declared, *id).to_string(), json!({"lo": lo, "hi": hi}))
                    })
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();
        println!("{}", serde_json::Value::Array(list));
    } else if solutions.is_empty() {
        println!("no solutions found");
    } else {
        for (i, assignment) in solutions.iter().enumerate() {
            println!("solution {}:", i + 1);
            print_assignment(declared, assignment, false);
        }
    }
}

pub fn print_stats(stats: &Stats, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string(stats).unwrap_or_else(|_| "{}".to_string()));
    } else {
        println!(
            "narrowing_ops={} failures={} node_count={} iterations_used={}",
            stats.narrowing_ops, stats.failures, stats.node_count, stats.iterations_used
        );
    }
}
