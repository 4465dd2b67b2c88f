use clap::Parser;
use lesson_core::optics::{self, DepthOfField};
use services::{AppServices, CourseOverview, ProgressConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, Command, DofArgs, EvArgs, MtfArgs};

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| format!("invalid --db value: {db_url}"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(format!("invalid --db value: {db_url}").into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn print_overview(name: &str, overview: &CourseOverview) {
    println!("{name} [{}] {}%", overview.course_id, overview.completion);
    for module in &overview.modules {
        let lock = if module.available { " " } else { "🔒" };
        println!(
            "  {lock} {} {:<12} {}",
            module.icon, module.id, module.status
        );
    }
    match &overview.next_module {
        Some(next) => println!("  next: {next}"),
        None => println!("  course complete"),
    }
}

fn run_calculator(command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Dof(DofArgs {
            focal,
            aperture,
            distance,
            coc,
        }) => {
            let dof = DepthOfField::compute(*focal, *aperture, *distance, *coc)?;
            println!("hyperfocal: {:.2} m", dof.hyperfocal_m);
            println!("near limit: {:.2} m", dof.near_limit_m);
            match (dof.far_limit_m, dof.total_m) {
                (Some(far), Some(total)) => {
                    println!("far limit:  {far:.2} m");
                    println!("total:      {total:.2} m");
                }
                _ => println!("far limit:  infinity"),
            }
        }
        Command::Ev(EvArgs {
            aperture,
            shutter,
            iso,
        }) => {
            let ev = optics::exposure_value(*aperture, *shutter, *iso)?;
            println!("EV {ev:.1}");
        }
        Command::Mtf(MtfArgs {
            aperture,
            wavelength,
            max_lp,
            samples,
        }) => {
            let cutoff = optics::diffraction_cutoff(*aperture, *wavelength)?;
            println!("cutoff: {cutoff:.0} lp/mm");
            for (freq, mtf) in optics::mtf_curve(*aperture, *wavelength, *max_lp, *samples)? {
                println!("{freq:>7.1} lp/mm  {:>5.1}%", mtf * 100.0);
            }
        }
        _ => {}
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !cli.command.needs_storage() {
        return run_calculator(&cli.command);
    }

    // Open + migrate SQLite here so core/services stay storage-agnostic.
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    let app = AppServices::new_sqlite(&db_url, ProgressConfig::with_gating(cli.gating)).await?;
    info!(db = %db_url, gating = %cli.gating, "services ready");

    let catalog = app.catalog();
    let progress = app.progress();

    match &cli.command {
        Command::Courses => {
            for (name, overview) in catalog.overviews().await {
                println!("{:<10} {:>3}%  {name}", overview.course_id, overview.completion);
            }
        }
        Command::Show { course } => {
            let name = catalog.course(course)?.name().to_owned();
            let overview = catalog.overview(course).await?;
            print_overview(&name, &overview);
        }
        Command::Set {
            course,
            module,
            status,
        } => {
            let known = catalog.course(course)?;
            if known.module(module).is_none() {
                return Err(format!("course {course} has no module {module}").into());
            }
            progress.update_user_progress(course, module, *status).await;
            let overview = catalog.overview(course).await?;
            print_overview(known.name(), &overview);
        }
        Command::Next { course } => {
            let modules = catalog.course(course)?.modules();
            match progress.get_next_recommended_module(course, modules).await {
                Some(next) => println!("{next}"),
                None => println!("course complete"),
            }
        }
        Command::Reset { course } => {
            catalog.course(course)?;
            progress.reset_course_progress(course).await;
            println!("progress for {course} reset");
        }
        Command::Lesson { id } => {
            let lesson = catalog.lesson(id)?;
            let calculator = lesson
                .calculator()
                .map_or_else(|| "none".to_owned(), |calc| format!("{calc:?}"));
            println!("{} ({}) calculator: {calculator}", lesson.name(), lesson.id());
        }
        Command::Dof(_) | Command::Ev(_) | Command::Mtf(_) => run_calculator(&cli.command)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
