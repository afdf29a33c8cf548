use clap::{Parser, Subcommand};
use engine::api::{
    load_sheet, roll_expression, roll_stats, sample_fighter, RollRequest, SheetSummary,
    StatsRequest,
};
use engine::sheet::format_modifier;
use engine::{AdMode, Dice, Skill};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Subcommand)]
enum Cmd {
    /// Roll a dice expression such as "2d6 + 1d8 + 4"
    Roll {
        /// Dice expression; terms are joined with '+'
        expression: String,
        /// RNG seed for determinism (fresh entropy if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Advantage mode: normal | advantage | disadvantage (applies to a lone 1d20 term)
        #[arg(long, default_value = "normal")]
        adv: AdMode,
        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Roll six ability scores: 4d6 drop lowest, 1s rerolled once, best 6 of 7
    Stats {
        /// RNG seed for determinism (fresh entropy if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Load a character sheet (JSON or YAML) and print its derived numbers
    Sheet {
        /// Path to the sheet file
        #[arg(long)]
        file: PathBuf,
        /// Replace the sheet's scores with a fresh roll first
        #[arg(long, default_value_t = false)]
        roll_scores: bool,
        /// RNG seed used with --roll-scores
        #[arg(long)]
        seed: Option<u64>,
        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Serialize the sample Fighter sheet to JSON (stdout)
    SheetDump {
        /// Single-line JSON instead of pretty-printed
        #[arg(long, default_value_t = false)]
        compact: bool,
    },
}

#[derive(Parser)]
#[command(name = "charsheet")]
#[command(about = "Character sheet dice roller")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn join(values: &[u8]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Roll {
            expression,
            seed,
            adv,
            json,
        } => {
            let req = RollRequest {
                expression,
                mode: adv,
                seed,
            };
            tracing::debug!(expression = %req.expression, mode = ?req.mode, ?seed, "roll");
            let res = roll_expression(&req)?;
            if json {
                println!("{}", serde_json::to_string(&res)?);
            } else {
                println!("Total: {}", res.total);
                println!("Details: {}", res.breakdown);
            }
        }
        Cmd::Stats { seed, json } => {
            let res = roll_stats(&StatsRequest { seed });
            tracing::debug!(?seed, candidates = ?res.candidates, "stats");
            if json {
                println!("{}", serde_json::to_string(&res)?);
            } else {
                println!("Stat Rolls (top 6): {}", join(&res.scores));
                println!("All 7: {}", join(&res.candidates));
            }
        }
        Cmd::Sheet {
            file,
            roll_scores,
            seed,
            json,
        } => {
            let mut sheet = load_sheet(&file)?;
            if roll_scores {
                let mut dice = match seed {
                    Some(s) => Dice::from_seed(s),
                    None => Dice::from_entropy(),
                };
                let set = engine::roll_ability_scores(&mut dice);
                tracing::info!(scores = ?set.as_slice(), "rolled new scores");
                sheet.apply_rolled_scores(set);
            }
            let summary = SheetSummary::from(&sheet);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Cmd::SheetDump { compact } => {
            let sheet = sample_fighter();
            if compact {
                println!("{}", serde_json::to_string(&sheet)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&sheet)?);
            }
        }
    }
    Ok(())
}

fn print_summary(s: &SheetSummary) {
    let name = if s.name.is_empty() { "(unnamed)" } else { &s.name };
    println!(
        "{}, level {} (proficiency {})",
        name,
        s.level,
        format_modifier(s.proficiency_bonus)
    );
    for (ability, score) in &s.scores {
        println!(
            "  {} {:>2} ({}) save {}",
            ability.abbrev(),
            score,
            s.modifiers[ability],
            format_modifier(s.saves[ability])
        );
    }
    println!(
        "initiative {}  passive perception {}",
        format_modifier(s.initiative),
        s.passive_perception
    );
    if let Some(hd) = &s.hit_dice {
        println!("hit dice {}", hd);
    }
    for skill in Skill::ALL {
        println!("  {:?}: {}", skill, format_modifier(s.skills[&skill]));
    }
}
