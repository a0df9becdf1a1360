use carver::cli::{Args, Command, ExportFormat};
use carver::models::RecordField;
use carver::scoring::{calculate_risk_breakdown, portfolio_summary};
use carver::selftest::run_self_tests;
use carver::store::FileStore;
use carver::ui::TerminalRenderer;
use carver::views::{Column, Role, SortDirection, TableQuery};
use carver::AppController;
use clap::Parser;
use env_logger::Env;

type MainResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

async fn run(args: Args) -> MainResult {
    let renderer = TerminalRenderer::new();
    let store = FileStore::new(&args.state_dir);
    let mut app = AppController::new(store, args.row_filter);

    match args.command {
        Command::Show { search, sort, asc } => {
            let query = TableQuery {
                search,
                sort_key: sort.parse::<Column>()?,
                direction: if asc { SortDirection::Asc } else { SortDirection::Desc },
            };
            renderer.print(&renderer.render_table(&app.table(&query)))?;
            let enriched = app.enriched();
            println!();
            renderer.print(&renderer.render_summary(
                portfolio_summary(&enriched).as_ref(),
                calculate_risk_breakdown(&enriched),
            ))?;
        }
        Command::Heatmap => {
            renderer.print(&renderer.render_heatmap(&app.heatmap()))?;
        }
        Command::Report { output } => match output {
            Some(path) => {
                app.write_report(&path)?;
                println!("📄 Markdown report generated: {}", path.display());
            }
            None => println!("{}", app.report()),
        },
        Command::Export { format, output } => {
            let text = match format {
                ExportFormat::Csv => app.export_csv()?,
                ExportFormat::Json => app.export_json()?,
            };
            let path = output.unwrap_or_else(|| format.default_file_name().into());
            std::fs::write(&path, text).map_err(|e| carver::CarverError::io(e, path.clone()))?;
            println!("📦 {} export written: {}", format, path.display());
        }
        Command::Import { file } => match app.import_file(&file).await {
            Ok(count) => println!("✅ Imported {} assets from {}", count, file.display()),
            Err(e) => {
                log::error!("Upload error: {}", e);
                eprintln!("Upload error: {}", e);
                std::process::exit(1);
            }
        },
        Command::Add => {
            let id = app.add_row();
            println!("➕ Added asset {}", id);
        }
        Command::Edit { id, field, value } => {
            let field: RecordField = field.parse()?;
            app.update_field(&id, field, &value)?;
            println!("✏️  Updated {} on {}", field, id);
        }
        Command::Remove { id } => {
            let removed = app.remove_row(&id)?;
            println!("🗑  Removed {}", removed.name);
        }
        Command::Reset => {
            app.reset_sample();
            println!("🔄 Register reset to sample data");
        }
        Command::Role { role } => {
            let role: Role = role.parse()?;
            app.set_role(role);
            println!("👤 Role set to {}", role);
        }
        Command::SelfTest => {
            let report = run_self_tests();
            renderer.print(&renderer.render_self_tests(&report))?;
            if !report.ok {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> MainResult {
    let args = Args::parse();

    // Initialize logging based on verbosity and quiet flags
    let log_level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    log::debug!("carver starting with args: {:?}", args);

    run(args).await
}
