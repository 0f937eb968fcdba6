use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

use bevm_emu::display::{register_summary, trace_row, view_bin, TRACE_HEADER};
use bevm_emu::snapshot::{load_state, save_state};
use bevm_emu::{BasicInstructionSet, Machine, MachineConfig, RunExit};

#[derive(Debug, Parser)]
#[command(name = "bevm", about = "Runs and traces BEVM memory images")]
struct Cli {
    /// JSON machine configuration (memory_size, ip_wrap, step_limit).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Stop after executing at most N instructions.
    #[arg(long, global = true)]
    max_steps: Option<u64>,

    /// More log output on stderr (repeatable).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Runs a compiled program and prints the final memory.
    Run {
        #[command(flatten)]
        image: ImageArgs,

        /// Write the final memory image here.
        #[arg(long)]
        dump: Option<PathBuf>,

        /// Write a JSON snapshot of registers and memory here.
        #[arg(long)]
        state: Option<PathBuf>,

        /// Words per row in the printed dump.
        #[arg(short = 'l', long = "length", default_value_t = 16)]
        length: usize,
    },
    /// Runs a compiled program printing one table row per instruction.
    Trace {
        #[command(flatten)]
        image: ImageArgs,

        /// Also write the table to this text file.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Formats a binary file as hex text.
    #[command(name = "viewbin")]
    ViewBin {
        /// Binary file to format.
        input: PathBuf,

        /// Also write the text to this file.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Items per row.
        #[arg(short = 'l', long = "length", default_value_t = 16)]
        length: usize,

        /// Group bytes into big-endian words.
        #[arg(short, long)]
        word: bool,
    },
}

#[derive(Debug, Args)]
struct ImageArgs {
    /// Big-endian memory image, two bytes per cell.
    #[arg(required_unless_present = "load_state")]
    input: Option<PathBuf>,

    /// Start from a JSON snapshot (registers and memory) instead of an image.
    #[arg(long, conflicts_with = "input")]
    load_state: Option<PathBuf>,

    /// Start address.
    #[arg(long = "ip", default_value_t = 0)]
    ip: u16,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<MachineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            MachineConfig::from_json(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => MachineConfig::default(),
    };
    if cli.max_steps.is_some() {
        config.step_limit = cli.max_steps;
    }
    Ok(config)
}

fn prepare(config: MachineConfig, image: &ImageArgs) -> Result<Machine<BasicInstructionSet>> {
    let mut machine = Machine::with_config(BasicInstructionSet, config)?;

    if image.ip as usize >= machine.memory().size() {
        bail!("invalid start address {:#05X}", image.ip);
    }

    if let Some(path) = &image.load_state {
        load_state(machine.cpu_mut(), path)
            .with_context(|| format!("failed to load state {}", path.display()))?;
        return Ok(machine);
    }

    let input = match &image.input {
        Some(path) => path,
        None => bail!("no image given"),
    };
    let bytes = fs::read(input)
        .with_context(|| format!("failed to read image {}", input.display()))?;
    if bytes.len() > machine.memory().image_len() {
        bail!(
            "image is too large: {} bytes, memory holds {}",
            bytes.len(),
            machine.memory().image_len()
        );
    }
    machine.memory_mut().load_padded(&bytes)?;
    Ok(machine)
}

fn report_exit(exit: RunExit) {
    match exit {
        RunExit::Halted { steps } => tracing::info!(steps, "program halted"),
        RunExit::StepLimit { steps } => eprintln!("stopped after {} steps without halting", steps),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Run { image, dump, state, length } => {
            if *length == 0 {
                bail!("row length must be greater than zero");
            }
            let mut machine = prepare(config, image)?;
            let exit = machine.run_at(image.ip).context("run aborted")?;
            report_exit(exit);

            let memory = machine.memory().dump()?;
            print!("{}", view_bin(&memory, *length, true));
            print!("{}", register_summary(machine.registers()));

            if let Some(path) = dump {
                fs::write(path, &memory)
                    .with_context(|| format!("failed to write dump {}", path.display()))?;
            }
            if let Some(path) = state {
                save_state(machine.cpu(), path)?;
            }
        }
        Command::Trace { image, out } => {
            let mut machine = prepare(config, image)?;
            let mut file = match out {
                Some(path) => Some(BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("failed to create {}", path.display()))?,
                )),
                None => None,
            };

            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            let mut write_error: Option<io::Error> = None;
            let mut emit = |text: &str| {
                let result = stdout
                    .write_all(text.as_bytes())
                    .and_then(|_| match file.as_mut() {
                        Some(f) => f.write_all(text.as_bytes()),
                        None => Ok(()),
                    });
                if let Err(err) = result {
                    write_error.get_or_insert(err);
                }
            };

            emit(TRACE_HEADER);
            let exit = machine
                .trace(image.ip, |step| emit(&trace_row(step)))
                .context("trace aborted")?;
            drop(emit);
            if let Some(err) = write_error {
                return Err(err).context("failed to write trace");
            }
            if let Some(mut f) = file {
                f.flush()?;
            }
            report_exit(exit);
        }
        Command::ViewBin { input, out, length, word } => {
            if *length == 0 {
                bail!("row length must be greater than zero");
            }
            let bytes = fs::read(input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let text = view_bin(&bytes, *length, *word);
            print!("{}", text);
            if let Some(path) = out {
                fs::write(path, &text)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
    }

    Ok(())
}
