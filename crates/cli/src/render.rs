//! Terminal rendering shared by the commands.

use console::style;

use arena_core::{BattleReport, BattleSnapshot, EndReason};

pub fn print_report(report: &BattleReport) {
    let headline = match (report.reason, report.winner) {
        (EndReason::LastStanding, Some(winner)) => {
            let name = report
                .entries
                .iter()
                .find(|entry| entry.id == winner)
                .map_or_else(|| winner.to_string(), |entry| entry.name.clone());
            style(format!("{name} wins after {} ticks", report.ticks)).green()
        }
        (EndReason::LastStanding, None) => {
            style(format!("Draw after {} ticks", report.ticks)).yellow()
        }
        (EndReason::TickLimit, _) => {
            style(format!("Stalemate after {} ticks", report.ticks)).yellow()
        }
        (EndReason::Deadlock, _) => {
            style(format!("Deadlocked after {} ticks", report.ticks)).yellow()
        }
        (EndReason::Terminated, _) => {
            style(format!("Terminated after {} ticks", report.ticks)).yellow()
        }
        (EndReason::Fault, _) => style(format!("Aborted after {} ticks", report.ticks)).red(),
    };
    println!("{}", headline.bold());

    for entry in &report.entries {
        let state = if entry.survived {
            style("alive").green()
        } else {
            style("down").red()
        };
        let tally = &entry.tally;
        println!(
            "  {:<12} {:<5}  hp {:>5.1}  dealt {:>6.1}  taken {:>6.1}  hits {}/{}  crits {}  dodges {}  blocks {}",
            entry.name,
            state,
            entry.health_left,
            tally.damage_dealt,
            tally.damage_taken,
            tally.hits,
            tally.attacks,
            tally.criticals,
            tally.dodges,
            tally.blocks
        );
    }
}

/// One line of health bars per tick, followed by that tick's log lines.
pub fn print_tick(snapshot: &BattleSnapshot) {
    let bars: Vec<String> = snapshot
        .combatants
        .iter()
        .map(|bug| {
            let label = format!("{} {:>3.0}", bug.name, bug.health);
            if bug.alive {
                label
            } else {
                style(label).dim().to_string()
            }
        })
        .collect();
    println!(
        "{} {}",
        style(format!("[{:>5}]", snapshot.elapsed_ticks)).dim(),
        bars.join("  ")
    );

    for line in snapshot.log_lines() {
        println!("        {}", style(line).italic());
    }
}
