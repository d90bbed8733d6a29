//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::fleet::VehicleKind;

/// Top-level CLI parser for `fleetdesk`.
#[derive(Debug, Parser)]
#[command(
    name = "fleetdesk",
    version,
    about = "Manage driver records and keep each truck and trailer with one driver"
)]
pub struct Cli {
    /// Show debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Replay a recorded cassette instead of contacting the backend.
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "fixture")]
    pub cassette: Option<PathBuf>,

    /// Work on a YAML fleet snapshot instead of the backend; changes are written back.
    #[arg(long, global = true, value_name = "FILE")]
    pub fixture: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List drivers with their vehicles and document status.
    Drivers,

    /// List active trucks or trailers and who holds them.
    Vehicles {
        /// `truck` or `trailer`.
        kind: VehicleKind,
    },

    /// Report which driver currently holds a vehicle.
    Check {
        /// `truck` or `trailer`.
        kind: VehicleKind,
        /// Vehicle id or number.
        vehicle: String,
        /// Ignore this driver when looking for a holder.
        #[arg(long, value_name = "DRIVER")]
        driver: Option<String>,
    },

    /// Give a vehicle to a driver, taking it from its current holder on confirmation.
    Assign {
        /// Driver id or code.
        driver: String,
        /// `truck` or `trailer`.
        kind: VehicleKind,
        /// Vehicle id or number.
        vehicle: String,
        /// Confirm a reassignment without asking.
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove a driver's truck or trailer.
    Release {
        /// Driver id or code.
        driver: String,
        /// `truck` or `trailer`.
        kind: VehicleKind,
    },

    /// Delete a driver.
    Delete {
        /// Driver id or code.
        driver: String,
    },
}

impl Command {
    /// Whether reassignments are confirmed without asking.
    #[must_use]
    pub const fn assume_yes(&self) -> bool {
        matches!(self, Self::Assign { yes: true, .. })
    }
}
