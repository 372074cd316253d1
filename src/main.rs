use clap::Parser;
use log::{error, info};
use simplelog::{ConfigBuilder, WriteLogger};
use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use cloud_installer::core::config::{self, CliOverrides, Config, ConfigError, ConfigSource};
use cloud_installer::core::wizard::{InstallType, SetupAnswers, WizardStep};
use cloud_installer::tui::components::{Banner, Header, StatusBar};
use cloud_installer::tui::{Body, EventLoop, PegasusGui, wizard};

#[derive(Parser)]
#[command(name = "cloud-install", about = "Ubuntu OpenStack installer", version)]
struct Args {
    /// Run without a terminal; every answer must come from config
    #[arg(long)]
    headless: bool,

    /// Config file (default: ~/.cloud-install/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    install_type: Option<InstallType>,

    /// OpenStack release, e.g. kilo
    #[arg(long)]
    openstack_release: Option<String>,

    #[arg(long)]
    log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

fn load_settings(args: &Args) -> Result<(Config, ConfigSource), ConfigError> {
    let (file, source) = config::load_config(args.config.as_deref())?;
    let cli = CliOverrides {
        headless: args.headless,
        openstack_release: args.openstack_release.clone(),
        install_type: args.install_type,
        log_file: args.log_file.clone(),
        log_level: args.log_level.clone(),
    };
    Ok((config::resolve(&file, &cli)?, source))
}

fn init_logging(config: &Config) {
    if let Some(dir) = config.log_file.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
    {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
}

fn install_gui(config: &Config) -> PegasusGui {
    PegasusGui::with_parts(
        config,
        Header::install(),
        Body::Banner(Banner::new()),
        StatusBar::new(),
    )
}

fn print_summary(answers: &SetupAnswers) {
    for line in answers.summary_lines() {
        println!("{line}");
    }
}

fn run_headless(config: Config) -> i32 {
    let answers = SetupAnswers::from_config(&config);
    let mut ev = EventLoop::build(config);
    let mut gui = install_gui(ev.config());
    if let Err(e) = ev.run(&mut gui) {
        eprintln!("cloud-install: {e}");
        return 1;
    }

    match answers.require_complete() {
        Ok(()) => {
            answers.apply_to(ev.config_mut());
            print_summary(&answers);
            ev.exit(0);
        }
        Err(e) => {
            error!("Headless setup incomplete: {e}");
            eprintln!("cloud-install: {e}");
            ev.exit(1);
        }
    }
    ev.error_code()
}

fn run_interactive(config: Config) -> i32 {
    let answers = Rc::new(RefCell::new(SetupAnswers::from_config(&config)));
    let mut ev = EventLoop::build(config);
    let mut gui = install_gui(ev.config());

    wizard::start(&mut ev, &mut gui, answers.clone());
    if let Err(e) = ev.run(&mut gui) {
        eprintln!("cloud-install: terminal error: {e}");
        return 1;
    }

    let answers = answers.borrow();
    if answers.next_step() == WizardStep::Summary {
        print_summary(&answers);
    } else {
        println!("Setup not completed.");
    }
    ev.error_code()
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (config, source) = match load_settings(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("cloud-install: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);
    source.log();
    info!(
        "cloud-install starting (headless={}, release={:?})",
        config.headless, config.openstack_release
    );

    let code = if config.headless {
        run_headless(config)
    } else {
        run_interactive(config)
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
