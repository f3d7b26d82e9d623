mod config;
mod display;
mod import;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use lesept_db::db::{count_draws, db_path, fetch_all_draws, fetch_last_draws, insert_draw, migrate, open_db};
use lesept_db::models::{Draw, validate_draw, MAX_NUM, PRIMARY_COUNT, SECONDARY_COUNT};
use lesept_db::rusqlite::Connection;
use lesept_engine::analyzer::analyze;
use lesept_engine::backtest;
use lesept_engine::strategies::all_strategies;
use lesept_engine::{compute_all_strategies, EngineConfig, PAYOUT_TABLE};
use crate::display::{
    display_backtest, display_draws, display_import_summary, display_payouts, display_stats,
    display_strategies, display_strategy_detail,
};

#[derive(Parser)]
#[command(name = "lesept", about = "Classement de stratégies pour le jeu à 28 numéros")]
struct Cli {
    /// Fichier de configuration JSON du moteur
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed du bandit (défaut : date du jour)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Taux d'exploration du bandit
    #[arg(long, global = true)]
    epsilon: Option<f64>,

    /// Nombre de tirages rejoués par le bandit
    #[arg(long, global = true)]
    bandit_window: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV (séparateur ';')
        #[arg(short, long, default_value = "assets/lesept.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les statistiques (fréquences, retards, part principale)
    Stats {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Classer toutes les stratégies
    Strategies {
        /// N'afficher que les N premières
        #[arg(short, long)]
        top: Option<usize>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Afficher la meilleure stratégie
    Best {
        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Afficher la stratégie de rang donné (1 = meilleure, défaut : la meilleure)
    Select {
        index: Option<usize>,
    },

    /// Rejouer chaque stratégie sur les derniers tirages
    Backtest {
        /// Nombre de tirages rejoués
        #[arg(short, long, default_value = "50")]
        window: usize,
    },

    /// Afficher le barème des gains
    Payouts,

    /// Ajouter un tirage manuellement
    Add,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    let engine_config = || -> Result<EngineConfig> {
        let loaded = config::load_config(cli.config.as_deref())?;
        config::apply_overrides(loaded, cli.seed, cli.epsilon, cli.bandit_window)
    };

    match cli.command {
        Command::Import { ref file } => cmd_import(&conn, file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Strategies { top, json } => cmd_strategies(&conn, &engine_config()?, top, json),
        Command::Best { json } => cmd_best(&conn, &engine_config()?, json),
        Command::Select { index } => cmd_select(&conn, &engine_config()?, index),
        Command::Backtest { window } => cmd_backtest(&conn, &engine_config()?, window),
        Command::Payouts => {
            display_payouts(&PAYOUT_TABLE);
            Ok(())
        }
        Command::Add => cmd_add(&conn),
    }
}

/// Tous les tirages, ou None (message affiché) si la base est vide.
fn load_draws(conn: &Connection) -> Result<Option<Vec<Draw>>> {
    if count_draws(conn)? == 0 {
        println!("Base vide. Lancez d'abord : lesept import");
        return Ok(None);
    }
    Ok(Some(fetch_all_draws(conn)?))
}

fn cmd_import(conn: &Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : lesept import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : lesept import");
        return Ok(());
    }
    let effective_window = window.min(n);
    let draws = fetch_last_draws(conn, effective_window)?;
    display_stats(&analyze(&draws), effective_window);
    Ok(())
}

fn cmd_strategies(conn: &Connection, config: &EngineConfig, top: Option<usize>, json: bool) -> Result<()> {
    let Some(draws) = load_draws(conn)? else {
        return Ok(());
    };
    let ranked = compute_all_strategies(&draws, config);
    let shown = match top {
        Some(n) => ranked.top(n),
        None => &ranked.strategies[..],
    };

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
    } else {
        display_strategies(shown, ranked.skipped_draws);
    }
    Ok(())
}

fn cmd_best(conn: &Connection, config: &EngineConfig, json: bool) -> Result<()> {
    let Some(draws) = load_draws(conn)? else {
        return Ok(());
    };
    let best = lesept_engine::compute_best_strategy(&draws, config);
    if json {
        println!("{}", serde_json::to_string_pretty(&best)?);
    } else {
        display_strategy_detail(&best);
    }
    Ok(())
}

fn cmd_select(conn: &Connection, config: &EngineConfig, index: Option<usize>) -> Result<()> {
    let Some(draws) = load_draws(conn)? else {
        return Ok(());
    };
    let ranked = compute_all_strategies(&draws, config);
    if let Some(Err(e)) = index.map(|i| ranked.select_by_index(i)) {
        println!("{e}. Meilleure stratégie affichée à la place.");
    }
    if let Some(result) = ranked.select_or_best(index) {
        display_strategy_detail(result);
    }
    Ok(())
}

fn cmd_backtest(conn: &Connection, config: &EngineConfig, window: usize) -> Result<()> {
    let Some(draws) = load_draws(conn)? else {
        return Ok(());
    };
    let strategies = all_strategies(config);

    println!("Backtest de {} stratégies sur {} tirages...",
        strategies.len(), window.min(draws.len().saturating_sub(1)));

    let pb = ProgressBar::new(strategies.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("=> "));

    let mut reports = Vec::with_capacity(strategies.len());
    for strategy in &strategies {
        pb.set_message(strategy.label().to_string());
        reports.push(backtest::evaluate(strategy.as_ref(), &draws, window));
        pb.inc(1);
    }
    pb.finish_with_message("Backtest terminé");

    display_backtest(&reports);
    Ok(())
}

fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let draw_id = prompt("Identifiant du tirage (ex: 2024-105) : ")?;
    let raw_date = prompt("Date (JJ/MM/AAAA, vide si inconnue) : ")?;
    let date = import::parse_date(&raw_date)?;

    let primary: [u8; PRIMARY_COUNT] = prompt_numbers("7 numéros principaux (séparés par des espaces, 1-28) : ")?;
    let secondary: [u8; SECONDARY_COUNT] = prompt_numbers("5 numéros secondaires (séparés par des espaces, 1-28) : ")?;

    validate_draw(&primary, &secondary)?;

    let draw = Draw { draw_id, date, primary, secondary };

    println!("\nTirage à insérer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_numbers<const N: usize>(msg: &str) -> Result<[u8; N]> {
    loop {
        let input = prompt(msg)?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == N => {
                let mut arr = [0u8; N];
                arr.copy_from_slice(&v);
                if arr.iter().all(|&n| (1..=MAX_NUM as u8).contains(&n))
                    && (0..N).all(|i| !arr[i + 1..].contains(&arr[i]))
                {
                    return Ok(arr);
                }
                println!("Numéros invalides (1-28, pas de doublons). Réessayez.");
            }
            _ => println!("Entrez exactement {} numéros. Réessayez.", N),
        }
    }
}
