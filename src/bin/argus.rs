/*
    Argus, attitude program planning for agile Earth observation
    Copyright (C) 2024 The Argus Developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use argus::io::config::MissionConfig;
use argus::md::Mission;
use argus::MissionError;
use clap::Parser;
use log::{error, info};
use std::env::{set_var, var};
use std::process::ExitCode;

const LOG_VAR: &str = "ARGUS_LOG";

/// Plans the attitude program of an agile Earth-observation satellite:
/// access computation, score-greedy observation scheduling and cinematic
/// plan assembly.
#[derive(Parser)]
#[command(name = "argus", version, about)]
struct Cli {
    /// Name of the mission
    mission_name: String,

    /// Number of target sites to consider, from the top of the ranking
    #[arg(short = 'n', long, default_value_t = 100, value_parser = clap::value_parser!(u16).range(1..=100))]
    number_of_sites: u16,

    /// Mission configuration file (YAML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Site catalogue CSV, overriding the configured path
    #[arg(long)]
    sites: Option<String>,

    /// VTS output directory, overriding the configured path
    #[arg(long)]
    vts_dir: Option<String>,

    /// Skip writing the VTS visualization files
    #[arg(long)]
    no_vts: bool,
}

fn main() -> ExitCode {
    if var(LOG_VAR).is_err() {
        set_var(LOG_VAR, "info");
    }
    pretty_env_logger::init_custom_env(LOG_VAR);

    let cli = Cli::parse();
    match run(&cli) {
        Ok(score) => {
            info!("final mission score: {score:.1}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<f64, MissionError> {
    let mut config = match &cli.config {
        Some(path) => MissionConfig::from_yaml(path)
            .map_err(|source| MissionError::Config { source })?,
        None => MissionConfig::default(),
    };
    if let Some(sites) = &cli.sites {
        config.sites_file = sites.clone();
    }
    if let Some(vts_dir) = &cli.vts_dir {
        config.vts_directory = vts_dir.clone();
    }

    let mut mission = Mission::new(&cli.mission_name, cli.number_of_sites as usize, config)?;
    info!("{mission}");

    // First, compute when the satellite can access each target: every access
    // window is an observation opportunity for the scheduler.
    let access_plan = mission.compute_access_plan();
    info!(
        "access plan: {} site(s) with at least one window",
        access_plan.values().filter(|tl| !tl.is_empty()).count()
    );

    // Then schedule at most one observation per target, best scores first,
    // without breaking the cinematic separation between observations.
    let observation_plan = mission.compute_observation_plan();
    info!("observation plan: {} observation(s)", observation_plan.len());

    // Then assemble the continuous attitude program over the whole horizon.
    let cinematic_plan = mission.compute_cinematic_plan()?;
    info!("{cinematic_plan}");

    // The score only counts once the plan passes the agility check.
    let valid = mission.check_cinematic_plan()?;
    info!("plan validity: {valid}");
    let score = mission.final_score()?;

    if !cli.no_vts {
        mission.generate_vts_visualization()?;
    }

    Ok(score)
}
