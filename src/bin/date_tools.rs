use clap::{Parser, Subcommand};
use late_fees::utils::logger;
use late_fees::{add_date_range, date_range, reformat_dates};

#[derive(Parser)]
#[command(name = "date-tools")]
#[command(about = "Date helpers for preparing checkout data")]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite YYYY-MM-DD dates as "DD Mon YYYY"
    Reformat { dates: Vec<String> },
    /// List N consecutive days starting at START (YYYY-MM-DD)
    Range { start: String, n: usize },
    /// Pair each value with a date counting up from START
    Pair { start: String, values: Vec<String> },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    match args.command {
        Command::Reformat { dates } => {
            for date in reformat_dates(&dates)? {
                println!("{}", date);
            }
        }
        Command::Range { start, n } => {
            for date in date_range(&start, n)? {
                println!("{}", date);
            }
        }
        Command::Pair { start, values } => {
            for (date, value) in add_date_range(values, &start)? {
                println!("{}\t{}", date, value);
            }
        }
    }

    Ok(())
}
