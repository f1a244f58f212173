use crate::analysis::{DirectorySummary, GlobalStats, Recommendation};
use crate::controller::AiAction;
use crate::draft::{ActionKind, Side, TurnInfo};
use crate::history::{DraftSnapshot, TeamSnapshot, WinnerPrediction};
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RecommendationRow {
    rank: String,
    champion: String,
    role: String,
    score: String,
    win: String,
    synergy: String,
    counter: String,
    meta: String,
}

#[derive(Tabled)]
struct TeamRow {
    #[tabled(rename = "")]
    label: String,
    blue: String,
    red: String,
}

fn side_label(side: Side) -> ColoredString {
    match side {
        Side::Blue => "BLUE".blue().bold(),
        Side::Red => "RED".red().bold(),
    }
}

fn percent(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

pub fn display_recommendations(recommendations: &[Recommendation], side: Side) {
    println!(
        "\n{} {}",
        "🎯 Recommendations for".bold().cyan(),
        side_label(side)
    );
    println!("{}\n", "=".repeat(72).cyan());

    if recommendations.is_empty() {
        println!("{}", "No recommendations available (no open roles or candidates)".yellow());
        return;
    }

    let rows: Vec<RecommendationRow> = recommendations
        .iter()
        .map(|rec| RecommendationRow {
            rank: format!("#{}", rec.rank),
            champion: rec.champion_name.clone(),
            role: rec.role.to_string(),
            score: format!("{:.3}", rec.total_score),
            win: if rec.oracle_fallback {
                format!("{}*", percent(rec.win_probability))
            } else {
                percent(rec.win_probability)
            },
            synergy: percent(rec.synergy_score),
            counter: percent(rec.counter_score),
            meta: format!("{:.3}", rec.meta_score),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if recommendations.iter().any(|r| r.oracle_fallback) {
        println!("{}", "* model unavailable, neutral win probability used".dimmed());
    }

    if let Some(top) = recommendations.first() {
        println!("\n{}", "Top Pick".bold().yellow());
        println!("  {} ({})", top.champion_name.bold(), top.role);
        for pair in top.synergy_pairs.iter().filter(|p| p.known) {
            println!(
                "  {} synergy with #{} {}: {}",
                "🤝".green(),
                pair.second.champion_id,
                pair.second.role,
                percent(pair.score)
            );
        }
        for m in top.counter_matchups.iter().filter(|m| m.known) {
            println!(
                "  {} vs #{} {}: {}",
                "⚔️".red(),
                m.enemy.champion_id,
                m.enemy.role,
                percent(m.win_rate)
            );
        }
        if top.meta_stats.fallback {
            println!("  {} no meta data for this role, global averages used", "ℹ️".cyan());
        }
    }
    println!();
}

fn team_bans(team: &TeamSnapshot) -> String {
    if team.bans.is_empty() {
        return "-".to_string();
    }
    team.bans
        .iter()
        .map(|b| b.champion_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn display_draft(snapshot: &DraftSnapshot, turn: &TurnInfo) {
    println!("\n{}", format!("📋 DRAFT ({})", snapshot.phase).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let mut rows = vec![TeamRow {
        label: "Bans".to_string(),
        blue: team_bans(&snapshot.blue),
        red: team_bans(&snapshot.red),
    }];
    for role in crate::draft::Role::ALL {
        let slot = |team: &TeamSnapshot| {
            team.picks
                .iter()
                .find(|p| p.role == role)
                .map(|p| p.champion_name.clone())
                .unwrap_or_else(|| "·".to_string())
        };
        rows.push(TeamRow {
            label: role.to_string(),
            blue: slot(&snapshot.blue),
            red: slot(&snapshot.red),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    match (turn.side, turn.action) {
        (Some(side), Some(action)) => {
            let who = if turn.is_user_turn { "your" } else { "opponent's" };
            let remaining = match side {
                Side::Blue => turn.blue_remaining,
                Side::Red => turn.red_remaining,
            };
            println!(
                "{} {} to {} ({} turn, {} {}s left)",
                "▶".green(),
                side_label(side),
                action,
                who,
                remaining,
                action
            );
            if action == ActionKind::Pick {
                let roles: Vec<String> = turn.vacant_roles.iter().map(|r| r.to_string()).collect();
                println!("  open roles: {}", roles.join(", "));
            }
        }
        _ => println!("{}", "✓ Draft complete".green().bold()),
    }
    println!();
}

pub fn display_ai_action(action: &AiAction) {
    let role = action
        .role
        .map(|r| format!(" ({})", r))
        .unwrap_or_default();
    println!(
        "{} {} {}s {}{} · {}",
        "🤖".cyan(),
        side_label(action.side),
        action.kind,
        action.champion_name.bold(),
        role,
        action.reason.dimmed()
    );
}

pub fn display_prediction(prediction: &WinnerPrediction) {
    println!("\n{}", "🏆 PREDICTED OUTCOME".bold().cyan());
    println!("{}", "=".repeat(60).cyan());
    println!("  {} {}", side_label(Side::Blue), percent(prediction.blue));
    println!("  {} {}", side_label(Side::Red), percent(prediction.red));
    println!(
        "  Winner: {} (model: {})",
        side_label(prediction.winner),
        prediction.model
    );
    if prediction.fallback {
        println!("  {}", "model unavailable, neutral split shown".yellow());
    }
    println!();
}

pub fn display_data_summary(summary: &DirectorySummary, global: &GlobalStats, model: &str) {
    println!("\n{}", "📊 DATA SUMMARY".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    println!("  Champions:            {}", summary.champions);
    println!("  Champion/role rows:   {}", summary.combinations);
    println!("  Multi-role champions: {}", summary.multi_role);
    println!(
        "  Avg pick/ban/win:     {} / {} / {}",
        percent(global.avg_pick_rate),
        percent(global.avg_ban_rate),
        percent(global.avg_win_rate)
    );
    println!("  Model:                {}\n", model);
}

pub fn display_help() {
    println!("\n{}", "Commands".bold().yellow());
    println!("  ban <champion>            ban a champion");
    println!("  pick <champion> [role]    pick a champion (role defaults to its best open role)");
    println!("  rec                       show recommendations for the side on the clock");
    println!("  ai                        let the AI play the current turn");
    println!("  status                    show the draft board");
    println!("  export                    write the draft to the history directory");
    println!("  help                      show this list");
    println!("  quit                      leave the draft\n");
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
