use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    time::Duration,
};
use useraccount::{
    calibration::CalibrationSession,
    document,
    motion::{
        HeelRaiseBaseline, HeelRaiseCounter, HeelRaiseThresholds, MotionCounter, PoseFrame,
        SquatCounter,
    },
    telemetry, UserAccount,
};

const UNSET: &str = "<unset>";
const MASKED_PASSWORD: &str = "********";

#[derive(Debug, Parser)]
struct Cli {
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build an account record and print its document
    Encode {
        #[arg(short, long)]
        user_id: Option<String>,

        #[arg(short = 'n', long)]
        user_name: Option<String>,

        #[arg(short, long, default_value_t = false)]
        ask_password: bool,

        #[arg(short, long, default_value_t = false)]
        pretty: bool,
    },
    /// Read a document and print the account record
    Decode {
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(short, long, default_value_t = false)]
        show_password: bool,
    },
    /// Build landmark baselines from standing pose frames
    Calibrate {
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long)]
        frame_width: f32,

        #[arg(long)]
        frame_height: f32,
    },
    /// Replay pose frames through an exercise counter
    Count {
        #[arg(value_enum)]
        exercise: Exercise,

        #[arg(short, long, default_value_t = 10)]
        max: u32,

        #[arg(short, long)]
        baseline: Option<PathBuf>,

        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Exercise {
    Squat,
    HeelRaise,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    match cli.command {
        Command::Encode {
            user_id,
            user_name,
            ask_password,
            pretty,
        } => {
            let mut account = UserAccount::default();
            if let Some(user_id) = user_id {
                account.set_user_id(user_id);
            }
            if let Some(user_name) = user_name {
                account.set_user_name(user_name);
            }
            if ask_password {
                let password = rpassword::prompt_password(format!("Enter password for {account}:"))
                    .context("Failed to read password")?;
                account.set_password(password);
            }
            let json = document::render_document(&account, pretty)
                .context("Failed to render account document")?;
            println!("{json}");
        }
        Command::Decode {
            file,
            show_password,
        } => {
            let json = read_input(file)?;
            let account =
                document::parse_document(&json).context("Failed to read account document")?;
            for line in account_lines(&account, show_password) {
                println!("{line}");
            }
        }
        Command::Calibrate {
            file,
            frame_width,
            frame_height,
        } => {
            let frames = parse_frames(&read_input(file)?)?;
            let mut session = CalibrationSession::new(frame_width, frame_height);
            for frame in frames {
                session.push(frame.pose);
                if session.is_complete() {
                    break;
                }
            }
            let baseline = session.finish().context("Calibration failed")?;
            let json = serde_json::to_string_pretty(&baseline.values())
                .context("Failed to render baseline")?;
            println!("{json}");
        }
        Command::Count {
            exercise,
            max,
            baseline,
            file,
        } => {
            let frames = parse_frames(&read_input(file)?)?;
            let total = match exercise {
                Exercise::Squat => {
                    let mut counter = SquatCounter::new(max);
                    counter.set_count_listener(Some(Box::new(print_count)));
                    for frame in &frames {
                        counter.on_pose_detected(&frame.pose);
                    }
                    counter.count()
                }
                Exercise::HeelRaise => {
                    let path = baseline
                        .ok_or_else(|| anyhow!("Counting heel raises needs --baseline"))?;
                    let baseline = read_baseline(&path)?;
                    let mut counter =
                        HeelRaiseCounter::new(max, baseline, HeelRaiseThresholds::default());
                    counter.set_count_listener(Some(Box::new(print_count)));
                    for frame in &frames {
                        counter.on_pose_at(&frame.pose, Duration::from_millis(frame.timestamp_ms));
                    }
                    counter.count()
                }
            };
            println!("Total: {total}");
        }
    }

    Ok(())
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut json = String::new();
            io::stdin()
                .read_to_string(&mut json)
                .context("Failed to read input from stdin")?;
            Ok(json)
        }
    }
}

fn print_count(count: u32) {
    println!("Count: {count}");
}

/// One JSON pose frame per non-empty line.
fn parse_frames(input: &str) -> Result<Vec<PoseFrame>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Malformed pose frame on line {}", index + 1))
        })
        .collect()
}

fn read_baseline(path: &Path) -> Result<HeelRaiseBaseline> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read baseline file {}", path.display()))?;
    serde_json::from_str(&json).context("Baseline needs left/right heel and eye heights")
}

fn account_lines(account: &UserAccount, show_password: bool) -> [String; 4] {
    let password = match account.password() {
        Some(password) if show_password => password,
        Some(_) => MASKED_PASSWORD,
        None => UNSET,
    };
    [
        account.to_string(),
        format!("User id:\t{}", account.user_id().unwrap_or(UNSET)),
        format!("User name:\t{}", account.user_name().unwrap_or(UNSET)),
        format!("Password:\t{password}"),
    ]
}
