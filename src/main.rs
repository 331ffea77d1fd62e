// Entry point and high-level CLI flow.
//
// - Option [1] loads and validates the review CSV, printing diagnostics.
// - Option [2] prints the dataset summary statistics.
// - Option [3] projects the ranked per-state table for a chosen polarity.
// - Option [4] generates the per-polarity Leaflet maps, the dashboard page
//   and a JSON summary into the output directory.
mod aggregate;
mod catalog;
mod loader;
mod map_doc;
mod output;
mod project;
mod reports;
mod session;
mod types;
mod util;

use map_doc::DashboardStats;
use once_cell::sync::Lazy;
use session::Session;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use util::format_int;

// Simple in-memory app state so we only load/validate the CSV once but can
// generate tables and maps multiple times in a single run.
static APP_STATE: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::Idle));

const DEFAULT_CSV: &str = "Rest-Mex_2025_train.csv";
const OUTPUT_DIR: &str = "mapas_restmex";

/// Read a single line of input after printing a prompt.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    read_line("Enter choice: ")
}

/// Ask for a polarity in 1..=5; an empty answer keeps the given default.
fn prompt_polarity(default: u8) -> u8 {
    loop {
        let answer = read_line(&format!("Polarity 1-5 [{}]: ", default));
        if answer.is_empty() {
            return default;
        }
        match util::parse_polarity(Some(&answer)) {
            Some(p) => return p,
            None => println!("Invalid polarity. Please enter a number between 1 and 5."),
        }
    }
}

/// Handle option [1]: load and validate the CSV file.
///
/// On success the new session replaces the old one wholesale and a short
/// textual summary of the load is printed.
fn handle_load() {
    let answer = read_line(&format!("CSV path [{}]: ", DEFAULT_CSV));
    let path = if answer.is_empty() {
        DEFAULT_CSV.to_string()
    } else {
        answer
    };

    println!("Loading dataset...");
    let next = Session::load(Path::new(&path));
    match &next {
        Session::Loaded(data) => {
            println!(
                "Dataset loaded: {} records, {} valid ({} dropped).",
                format_int(data.report.total_rows as u64),
                format_int(data.report.valid_rows as u64),
                format_int(data.report.dropped_rows as u64)
            );
            println!(
                "Unique regions: {}, establishment types: {}.",
                reports::unique_regions(&data.valid_rows),
                reports::unique_types(&data.valid_rows)
            );
            println!("Top regions:");
            for entry in reports::top_regions(&data.valid_rows, 10) {
                println!("  - {}: {} reviews", entry.region, format_int(entry.reviews));
            }
            println!();
        }
        Session::Error(msg) => {
            eprintln!("Failed to load file: {}\n", msg);
        }
        Session::Idle => {}
    }
    let mut state = APP_STATE.lock().unwrap();
    *state = next;
}

/// Handle option [2]: print summary statistics for the loaded dataset.
fn handle_summary() {
    let state = APP_STATE.lock().unwrap();
    let Some(data) = state.data() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    println!("Summary - Rest-Mex 2025");
    println!(
        "Total reviews: {}",
        format_int(data.report.valid_rows as u64)
    );
    println!(
        "Unique regions: {} ({} with coordinates)",
        reports::unique_regions(&data.valid_rows),
        data.aggregate.buckets.len()
    );
    println!(
        "Establishment types: {}\n",
        reports::unique_types(&data.valid_rows)
    );

    println!("Polarity distribution:");
    let distribution = reports::polarity_distribution(&data.valid_rows);
    output::preview_table_rows(&reports::distribution_table(&distribution), 5);

    println!("Top 10 regions:");
    for (idx, entry) in reports::top_regions(&data.valid_rows, 10).iter().enumerate() {
        println!(
            "  {:2}. {}: {}",
            idx + 1,
            entry.region,
            format_int(entry.reviews)
        );
    }
    println!("\nTop 5 establishment types:");
    for (idx, entry) in reports::top_types(&data.valid_rows, 5).iter().enumerate() {
        println!(
            "  {}. {}: {}",
            idx + 1,
            entry.establishment_type,
            format_int(entry.reviews)
        );
    }
    println!();
}

/// Handle option [3]: ranked table and KPIs for a selected polarity.
///
/// The selection is remembered on the session, so pressing Enter on the next
/// visit re-projects the same polarity.
fn handle_table() {
    let mut state = APP_STATE.lock().unwrap();
    let Some(data) = state.data_mut() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let polarity = prompt_polarity(data.selected_polarity);
    data.selected_polarity = polarity;

    let (view_rows, stats) = project::project(&data.aggregate, polarity);
    println!(
        "\nPolarity {} ({}): {} reviews across {} states, max {} per state.",
        polarity,
        catalog::polarity_label(polarity),
        format_int(stats.total_reviews),
        stats.total_states,
        format_int(stats.max_count)
    );
    if stats.unmappable_rows > 0 {
        println!(
            "Note: {} rows belong to regions without coordinates and are excluded.",
            format_int(stats.unmappable_rows)
        );
    }
    println!();

    let table = reports::build_ranked_rows(&view_rows);
    output::preview_table_rows(&table, 10);

    let file = format!("tabla_regiones_polaridad_{}.csv", polarity);
    if let Err(e) = output::write_csv(Path::new(&file), &table) {
        eprintln!("Write error: {}", e);
    } else {
        println!("(Full table exported to {})\n", file);
    }
}

/// Handle option [4]: generate all map documents, the dashboard and the
/// JSON summary.
fn handle_generate_maps() {
    let state = APP_STATE.lock().unwrap();
    let Some(data) = state.data() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let out_dir = PathBuf::from(OUTPUT_DIR);
    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        eprintln!("Could not create output directory {}: {}", OUTPUT_DIR, e);
        return;
    }

    println!("Generating maps...");
    let mut written: Vec<PathBuf> = Vec::new();
    for polarity in 1..=5u8 {
        let (view_rows, stats) = project::project(&data.aggregate, polarity);
        let view = map_doc::build_map_view(&view_rows, polarity, &stats);
        let path = out_dir.join(map_doc::map_file_name(polarity));
        match output::write_html(&path, &map_doc::render_map(&view)) {
            Ok(()) => written.push(path),
            Err(e) => eprintln!("Write error: {}", e),
        }
    }

    // Neutral map doubles as the dashboard's initial iframe target.
    let (view_rows, stats) = project::project(&data.aggregate, session::DEFAULT_POLARITY);
    let view = map_doc::build_map_view(&view_rows, session::DEFAULT_POLARITY, &stats);
    let default_path = out_dir.join("mapa_default.html");
    match output::write_html(&default_path, &map_doc::render_map(&view)) {
        Ok(()) => written.push(default_path),
        Err(e) => eprintln!("Write error: {}", e),
    }

    let dashboard = map_doc::render_dashboard(&DashboardStats {
        total_reviews: data.report.valid_rows,
        state_count: data.aggregate.buckets.len(),
        type_count: reports::unique_types(&data.valid_rows),
    });
    let dashboard_path = out_dir.join("dashboard_restmex.html");
    match output::write_html(&dashboard_path, &dashboard) {
        Ok(()) => written.push(dashboard_path),
        Err(e) => eprintln!("Write error: {}", e),
    }

    let summary = reports::build_summary_export(&data.report, &data.valid_rows, &data.aggregate);
    let summary_path = out_dir.join("summary.json");
    match output::write_json(&summary_path, &summary) {
        Ok(()) => written.push(summary_path),
        Err(e) => eprintln!("Write error: {}", e),
    }

    println!("Generated {} files:", written.len());
    for path in &written {
        println!("  - {}", path.display());
    }
    println!("Open {}/dashboard_restmex.html in a browser.\n", OUTPUT_DIR);
}

/// Ask the user whether to go back to the menu after generating maps.
fn prompt_back_to_menu() -> bool {
    loop {
        let resp = read_line("Back to the menu (Y/N): ").to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = catalog::verify_catalog() {
        eprintln!("Invalid region tables: {}", e);
        return;
    }

    loop {
        println!("Rest-Mex 2025 geographic analysis");
        println!("[1] Load the dataset");
        println!("[2] Summary statistics");
        println!("[3] Ranked table by polarity");
        println!("[4] Generate maps & dashboard");
        println!("[0] Exit\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!();
                handle_summary();
            }
            "3" => {
                handle_table();
            }
            "4" => {
                println!();
                handle_generate_maps();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 0-4.\n");
            }
        }
    }
}
