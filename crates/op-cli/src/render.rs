//! Plain-text renderings for terminal output.

use std::fmt::Write;

use op_core::{CellSnapshot, CoinEngine, CognitiveFunction, OpType};

fn join(functions: &[CognitiveFunction]) -> String {
    functions
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn op_type(t: &OpType) -> String {
    let social: String = t.social_stack().iter().map(|a| a.letter()).collect();
    let mut out = String::new();
    let _ = writeln!(out, "type:       {}", t.summary());
    let _ = writeln!(out, "stack:      {}", join(t.grant_stack()));
    let _ = writeln!(out, "saviors:    {}", join(t.savior_functions()));
    let _ = writeln!(out, "animals:    {}", t.animal_stack());
    let _ = writeln!(out, "double:     {}", t.double_activated_animal());
    let _ = writeln!(out, "masculine:  {}", join(t.masculine_functions()));
    let _ = writeln!(out, "quadra:     {}", t.quadra());
    let _ = write!(out, "social:     {} {social}", t.social_type());
    out
}

pub fn cell(snapshot: &CellSnapshot) -> String {
    match snapshot {
        CellSnapshot::Function {
            order,
            label,
            is_demon,
            is_masculine,
        } => {
            let mut flags = Vec::new();
            if *is_demon {
                flags.push("demon");
            }
            if *is_masculine {
                flags.push("masculine");
            }
            format!("{:<16} {label}  {}", format!("fn{order}"), flags.join(" "))
                .trim_end()
                .to_string()
        }
        CellSnapshot::Animal {
            position,
            animal,
            order,
            is_double_activated,
        } => {
            let animal = animal.map_or_else(|| "?".to_string(), |a| a.to_string());
            let order = order.map_or_else(|| "-".to_string(), |o| o.to_string());
            let double = if *is_double_activated { "  double" } else { "" };
            format!("{:<16} {animal}   order={order}{double}", position.label())
        }
    }
}

pub fn engine(engine: &CoinEngine) -> String {
    let mut out = String::new();
    for snapshot in engine.snapshots() {
        let _ = writeln!(out, "{}", cell(&snapshot));
    }
    let conflicts = engine.conflicts();
    if conflicts.is_empty() {
        out.push_str("conflicts: none");
    } else {
        out.push_str("conflicts:");
        for conflict in conflicts {
            let _ = write!(out, "\n  - {conflict}");
        }
    }
    out
}
