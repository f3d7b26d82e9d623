use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};
use textplots::Plot;

use crate::import::ImportResult;
use lesept_db::models::{Draw, MAX_NUM};
use lesept_engine::analyzer::Analysis;
use lesept_engine::backtest::BacktestReport;
use lesept_engine::{PayoutRow, StrategyFamily, StrategyResult};

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Tirage", "Date", "Principaux", "Secondaires"]);

    for draw in draws {
        let mut primary = draw.primary;
        primary.sort();
        let mut secondary = draw.secondary;
        secondary.sort();

        let date = draw
            .date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "—".to_string());

        table.add_row(vec![
            &draw.draw_id,
            &date,
            &join_numbers(&primary),
            &join_numbers(&secondary),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(analysis: &Analysis, window: u32) {
    println!("\n📊 Statistiques sur les {} derniers tirages\n", window);
    if analysis.skipped_draws > 0 {
        println!("  ({} tirage(s) malformé(s) ignoré(s))\n", analysis.skipped_draws);
    }

    let mut table = new_table(vec!["Numéro", "Total", "Principal", "Secondaire", "Part principale", "Retard"]);

    let mut numbers: Vec<u8> = (1..=MAX_NUM as u8).collect();
    numbers.sort_by_key(|&n| std::cmp::Reverse(analysis.total_freq[(n - 1) as usize]));

    for n in numbers {
        let idx = (n - 1) as usize;
        let ratio = analysis.primary_ratio(n);
        let color = if ratio >= 0.5 { Color::Green } else { Color::Cyan };
        let gap = match analysis.last_seen[idx] {
            Some(g) => g.to_string(),
            None => "jamais".to_string(),
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", n)),
            Cell::new(analysis.total_freq[idx]),
            Cell::new(analysis.primary_freq[idx]),
            Cell::new(analysis.secondary_freq[idx]),
            Cell::new(format!("{:.2}", ratio)).fg(color),
            Cell::new(gap),
        ]);
    }
    println!("{table}");

    display_frequency_chart(analysis);
}

fn display_frequency_chart(analysis: &Analysis) {
    let points: Vec<(f32, f32)> = analysis
        .total_freq
        .iter()
        .enumerate()
        .map(|(i, &f)| ((i + 1) as f32, f as f32))
        .collect();
    let y_max = points.iter().map(|p| p.1).fold(0.0f32, f32::max);
    if y_max <= 0.0 {
        println!("  (Pas de données à afficher)");
        return;
    }

    println!("\n== Fréquence totale par numéro ==\n");
    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, 0.5, MAX_NUM as f32 + 0.5, 0.0, y_max * 1.1);
    println!("{}", chart.lineplot(&shape));
}

pub fn display_strategies(results: &[StrategyResult], skipped_draws: usize) {
    println!("\n🎯 Stratégies classées\n");
    if skipped_draws > 0 {
        println!("  ({} tirage(s) malformé(s) ignoré(s))\n", skipped_draws);
    }

    let mut table = new_table(vec!["#", "Stratégie", "Famille", "Numéros", "EV", "ROI", "Note"]);

    for (i, result) in results.iter().enumerate() {
        let color = match result.family {
            StrategyFamily::Ia => Color::Cyan,
            StrategyFamily::Heuristic => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&result.label),
            Cell::new(result.family.to_string()).fg(color),
            Cell::new(join_numbers(&result.numbers)),
            Cell::new(format!("{:.2}", result.ev)),
            Cell::new(format!("{:.2}", result.roi)),
            Cell::new(format!("{:.2}", result.rating_score)),
        ]);
    }
    println!("{table}");
}

pub fn display_strategy_detail(result: &StrategyResult) {
    println!("\n🎲 {} ({}, {})\n", result.label, result.id, result.family);
    println!("  Numéros : {}", join_numbers(&result.numbers));
    println!("  EV      : {:.2}", result.ev);
    println!("  ROI     : {:.2}", result.roi);
    println!("  Note    : {:.2}", result.rating_score);
    println!("  Méthode : {}", result.method_description);
}

pub fn display_backtest(reports: &[BacktestReport]) {
    println!("\n== Backtest walk-forward ==\n");
    if let Some(skipped) = reports.first().map(|r| r.skipped_draws).filter(|&s| s > 0) {
        println!("  ({} tirage(s) malformé(s) ignoré(s))\n", skipped);
    }

    let mut header = vec![
        "Stratégie".to_string(),
        "Tirages".to_string(),
        "Récompense moy.".to_string(),
        "Rangs gagnés".to_string(),
        "Gains barème".to_string(),
    ];
    header.extend((0..=7).rev().map(|k| format!("{k} bons")));
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    let mut sorted: Vec<&BacktestReport> = reports.iter().collect();
    sorted.sort_by(|a, b| b.average_reward.total_cmp(&a.average_reward));

    for report in sorted {
        let mut row = vec![
            report.strategy_id.clone(),
            report.evaluations.to_string(),
            format!("{:.3}", report.average_reward),
            report.prize_hits.to_string(),
            format!("{:.0}", report.total_prize),
        ];
        row.extend(report.match_histogram.iter().rev().map(|c| c.to_string()));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_payouts(rows: &[PayoutRow]) {
    println!("\n💶 Barème des gains\n");

    let mut table = new_table(vec!["Bons numéros", "Principaux", "Secondaires", "Cote (1 sur)", "Gain"]);

    for row in rows {
        table.add_row(vec![
            row.total_matched.to_string(),
            row.primary_matched.to_string(),
            row.secondary_matched.to_string(),
            format!("{:.2}", row.odds_denominator),
            format!("{:.0}", row.payout),
        ]);
    }
    println!("{table}");
}
