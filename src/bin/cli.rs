//! ferrydesk CLI
//!
//! One-shot command-line interface over the terminal core. Each invocation
//! opens the data directory, runs a single operation, and exits — the
//! interactive menu flow of a booth terminal lives elsewhere.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use ferrydesk::{Config, FerryError, Terminal};

/// ferrydesk terminal operations
#[derive(Parser, Debug)]
#[command(name = "ferrydesk")]
#[command(about = "Ferry sailings, vehicles, and reservations")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./ferrydesk_data")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a sailing
    AddSailing {
        /// Sailing id in TER-DD-HH form
        id: String,
        /// Vessel name
        vessel: String,
        /// Low-lane capacity total (meters)
        low: i32,
        /// High-lane capacity total (meters)
        high: i32,
    },

    /// Edit a sailing's vessel or capacity totals
    EditSailing {
        id: String,
        #[arg(long)]
        vessel: Option<String>,
        #[arg(long)]
        low: Option<i32>,
        #[arg(long)]
        high: Option<i32>,
    },

    /// Re-key a sailing onto a new terminal/day/hour
    RenameSailing { from: String, to: String },

    /// Delete a sailing (its reservations must be moved or cleared first)
    DeleteSailing { id: String },

    /// Print the sailing report
    Report {
        /// Rows per page
        #[arg(short, long, default_value = "5")]
        page_size: usize,
    },

    /// Register a vehicle profile
    AddVehicle {
        plate: String,
        phone: String,
        /// Length in meters
        length: f32,
        /// Height in meters
        height: f32,
    },

    /// Remove a vehicle profile
    DeleteVehicle { plate: String },

    /// Reserve a vehicle onto a sailing
    Reserve {
        sailing: String,
        plate: String,
        /// Contact phone, used if the vehicle is new
        #[arg(long, default_value = "")]
        phone: String,
        /// Length in meters (new special vehicles)
        #[arg(long, default_value = "0")]
        length: f32,
        /// Height in meters (new special vehicles)
        #[arg(long, default_value = "0")]
        height: f32,
    },

    /// Check a reservation in and print the fare
    CheckIn { sailing: String, plate: String },

    /// Cancel a reservation, restoring lane capacity
    Cancel { sailing: String, plate: String },

    /// Delete every reservation on a sailing
    ClearSailing { sailing: String },

    /// Move reservations between sailings (capacity permitting)
    MoveReservations { from: String, to: String },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,ferrydesk=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let config = Config::builder().data_dir(&args.data_dir).build();
    let terminal = match Terminal::open(config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("failed to open data directory: {}", e);
            std::process::exit(1);
        }
    };

    match run(terminal, args.command) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(mut terminal: Terminal, command: Commands) -> Result<(), FerryError> {
    match command {
        Commands::AddSailing {
            id,
            vessel,
            low,
            high,
        } => {
            terminal.add_sailing(&id, &vessel, low, high)?;
            println!("sailing {} added", id);
        }

        Commands::EditSailing {
            id,
            vessel,
            low,
            high,
        } => {
            let sailing = terminal.edit_sailing(&id, vessel.as_deref(), low, high)?;
            println!(
                "sailing {} now {} LCLL={} HCLL={}",
                sailing.id(),
                sailing.vessel(),
                sailing.low_total(),
                sailing.high_total()
            );
        }

        Commands::RenameSailing { from, to } => {
            terminal.rename_sailing(&from, &to)?;
            println!("sailing {} renamed to {}", from, to);
        }

        Commands::DeleteSailing { id } => {
            terminal.delete_sailing(&id)?;
            println!("sailing {} deleted", id);
        }

        Commands::Report { page_size } => {
            println!(
                "{:<10}  {:<25}  {:>7}  {:>7}  {:>8}",
                "Sailing", "Vessel", "LRL", "HRL", "Vehicles"
            );
            terminal.reset_sailing_report();
            loop {
                let page = terminal.sailing_report_page(page_size)?;
                for row in &page {
                    println!(
                        "{:<10}  {:<25}  {:>7.1}  {:>7.1}  {:>8}",
                        row.sailing.id(),
                        row.sailing.vessel(),
                        row.sailing.low_remaining(),
                        row.sailing.high_remaining(),
                        row.vehicles
                    );
                }
                if page.is_empty() || page.len() < page_size {
                    break;
                }
            }
        }

        Commands::AddVehicle {
            plate,
            phone,
            length,
            height,
        } => {
            terminal.add_vehicle(&plate, &phone, length, height)?;
            println!("vehicle {} added", plate);
        }

        Commands::DeleteVehicle { plate } => {
            terminal.delete_vehicle(&plate)?;
            println!("vehicle {} deleted", plate);
        }

        Commands::Reserve {
            sailing,
            plate,
            phone,
            length,
            height,
        } => {
            terminal.add_reservation(&sailing, &plate, &phone, length, height)?;
            println!("reserved {} on {}", plate, sailing);
        }

        Commands::CheckIn { sailing, plate } => {
            let fare = terminal.check_in(&sailing, &plate)?;
            println!("checked in {} on {}, fare ${:.2}", plate, sailing, fare);
        }

        Commands::Cancel { sailing, plate } => {
            terminal.cancel_reservation(&plate, &sailing)?;
            println!("cancelled {} on {}", plate, sailing);
        }

        Commands::ClearSailing { sailing } => {
            let count = terminal.delete_all_on_sailing(&sailing)?;
            println!("deleted {} reservation(s) on {}", count, sailing);
        }

        Commands::MoveReservations { from, to } => {
            let count = terminal.move_reservations(&from, &to)?;
            println!("moved {} reservation(s) from {} to {}", count, from, to);
        }
    }

    terminal.close()
}
