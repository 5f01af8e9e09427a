//! Main robot-side executable entry point.
//!
//! # Architecture
//!
//! The executable runs every controller against the simulated equipment in a fixed-period loop:
//!
//!     - Initialise the session, logging, parameters and modules
//!     - Main loop:
//!         - Vision input acquisition
//!         - Target tracking processing
//!         - Aim command execution (drivetrain demand)
//!         - Actuator control processing
//!         - Velocity command execution
//!         - Archiving
//!     - On exit, end every running command, leaving the equipment in a neutral state
//!
//! # Modules
//!
//! All modules (e.g. `act_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!     2. Be constructed from validated parameters.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use structopt::StructOpt;

// Internal
use robot_lib::{
    act_ctrl::{self, ActCtrl},
    aim_ctrl::{self, AimCtrl},
    cmd::{ActGoal, ActGoalCmd, AimCmd, AimContext, Command, VelCmd},
    data_store::DataStore,
    params::RobotExecParams,
    sim::{SimActuator, SimVelocity, SimWorld},
    telemetry::{keys, TelemetrySink},
    tgt_track::{self, TgtTracker, VisionFrontend},
    units::UnitConverter,
    vel_ctrl::{self, VelCtrl},
};
use util::{
    archive::Archived,
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    params::load_validated,
    session::Session,
    time::seconds_to_std,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "robot_exec", about = "Onboard actuator and aim controller")]
struct Opt {
    /// Directory holding the parameter files, defaults to `$ROBOT_SW_ROOT/params`
    #[structopt(short, long, parse(from_os_str))]
    params_dir: Option<PathBuf>,

    /// Number of cycles to run, overrides the parameter file
    #[structopt(short = "n", long)]
    cycles: Option<u64>,

    /// Actuator goal in degrees, overrides the parameter file
    #[structopt(short, long, allow_hyphen_values = true)]
    goal_deg: Option<f64>,

    /// Named actuator setpoint, used if no goal in degrees is given
    #[structopt(short, long)]
    setpoint: Option<String>,

    /// Run cycles back to back instead of at the cycle period
    #[structopt(long)]
    no_realtime: bool,

    /// Increase the log level (-v debug, -vv trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("robot_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let level = match opt.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    logger_init(level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let params_dir = match opt.params_dir {
        Some(ref d) => d.clone(),
        None => host::get_sw_root()
            .wrap_err("Failed to find the software root")?
            .join("params"),
    };

    let mut exec_params: RobotExecParams = load_validated(&params_dir, "robot_exec.toml")
        .wrap_err("Could not load exec params")?;

    if let Some(n) = opt.cycles {
        exec_params.num_cycles = n;
    }
    if opt.no_realtime {
        exec_params.realtime = false;
    }

    let act_params: act_ctrl::Params =
        load_validated(&params_dir, "act_ctrl.toml").wrap_err("Could not load ActCtrl params")?;
    let tgt_params: tgt_track::Params = load_validated(&params_dir, "tgt_track.toml")
        .wrap_err("Could not load TgtTrack params")?;
    let aim_params: aim_ctrl::Params =
        load_validated(&params_dir, "aim_ctrl.toml").wrap_err("Could not load AimCtrl params")?;
    let vel_params: vel_ctrl::Params =
        load_validated(&params_dir, "vel_ctrl.toml").wrap_err("Could not load VelCtrl params")?;

    info!("Exec parameters loaded");

    let period_s = exec_params.cycle_period_s;
    let cycle_frequency_hz = 1.0 / period_s;

    // ---- INITIALISE EQUIPMENT ----

    let mut world = SimWorld::new(&exec_params.sim, period_s);
    let act_units =
        UnitConverter::new(act_params.gear_ratio).wrap_err("Invalid actuator gear ratio")?;
    let act_driver =
        SimActuator::new(act_units.to_mechanism(exec_params.sim.act_initial_deg), period_s);
    let vel_driver = SimVelocity::new(exec_params.sim.velocity_response);

    info!("Simulated equipment initialised");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();
    ds.operator_vel_ms = (exec_params.operator_vel_ms[0], exec_params.operator_vel_ms[1]);

    let mut act_ctrl =
        ActCtrl::new(act_driver, &act_params).wrap_err("Failed to initialise ActCtrl")?;
    act_ctrl
        .init_archives(&session)
        .map_err(|e| eyre!("{}", e))
        .wrap_err("Failed to initialise ActCtrl archives")?;
    info!("ActCtrl init complete");

    let mut tgt_track =
        TgtTracker::new(&tgt_params, &world.caps()).wrap_err("Failed to initialise TgtTrack")?;
    tgt_track
        .init_archives(&session)
        .map_err(|e| eyre!("{}", e))
        .wrap_err("Failed to initialise TgtTrack archives")?;
    info!("TgtTrack init complete");

    let mut aim_ctrl = AimCtrl::new(&aim_params).wrap_err("Failed to initialise AimCtrl")?;
    aim_ctrl
        .init_archives(&session)
        .map_err(|e| eyre!("{}", e))
        .wrap_err("Failed to initialise AimCtrl archives")?;
    info!("AimCtrl init complete");

    let mut vel_ctrl =
        VelCtrl::new(vel_driver, &vel_params).wrap_err("Failed to initialise VelCtrl")?;
    vel_ctrl
        .init_archives(&session)
        .map_err(|e| eyre!("{}", e))
        .wrap_err("Failed to initialise VelCtrl archives")?;
    info!("VelCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE COMMANDS ----

    // Command line goals take precedence over the parameter file
    let act_goal = opt
        .goal_deg
        .map(ActGoal::Degrees)
        .or_else(|| opt.setpoint.clone().map(ActGoal::Named))
        .or_else(|| exec_params.act_goal_deg.map(ActGoal::Degrees))
        .or_else(|| exec_params.act_setpoint.clone().map(ActGoal::Named));

    let mut act_cmd = act_goal.map(ActGoalCmd::new);
    let mut aim_cmd = AimCmd::new(aim_ctrl);
    let mut vel_cmd = VelCmd::new(exec_params.vel_target_rps);

    if let Some(ref mut c) = act_cmd {
        info!("Moving actuator to {:?}", c.goal());
        c.initialize(&mut act_ctrl);
    }
    vel_cmd.initialize(&mut vel_ctrl);

    // ---- MAIN LOOP ----

    info!("Begining main loop ({} cycles)\n", exec_params.num_cycles);

    while ds.num_cycles < exec_params.num_cycles {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(cycle_frequency_hz);

        // ---- DATA INPUT ----

        ds.tgt_track_input.detection = world.latest_detection();

        // ---- TARGET TRACKING ----

        match tgt_track.proc(&ds.tgt_track_input) {
            Ok((o, r)) => {
                ds.tgt_track_output = o;
                ds.tgt_track_status_rpt = r;
            }
            Err(e) => warn!("Error during TgtTrack processing: {}", e),
        }
        tgt_track.publish(&mut ds.dashboard);

        // ---- AIM ----

        {
            let mut ctx = AimContext {
                tracker: &tgt_track,
                drive: &mut world,
                dashboard: &mut ds.dashboard,
                operator_vel_ms: ds.operator_vel_ms,
            };
            aim_cmd.execute(&mut ctx);
        }
        ds.aim_ctrl_output = aim_cmd.ctrl().last_dem();
        ds.aim_ctrl_status_rpt = *aim_cmd.ctrl().report();

        // ---- ACTUATOR CONTROL ----

        match act_ctrl.proc(&ds.act_ctrl_input) {
            Ok((o, r)) => {
                ds.act_ctrl_output = Some(o);
                ds.act_ctrl_status_rpt = r;
            }
            Err(e) => warn!("Error during ActCtrl processing: {}", e),
        }

        ds.dashboard.put_number(keys::ACT_POSITION_DEG, ds.act_ctrl_status_rpt.position_deg);
        ds.dashboard.put_number(keys::ACT_GOAL_DEG, ds.act_ctrl_status_rpt.goal_deg);
        ds.dashboard.put_bool(keys::ACT_AT_GOAL, ds.act_ctrl_status_rpt.at_goal);

        let act_finished = match act_cmd {
            Some(ref c) => c.is_finished(&act_ctrl),
            None => false,
        };
        if act_finished {
            if let Some(mut c) = act_cmd.take() {
                c.end(&mut act_ctrl, false);
                info!(
                    "Actuator reached its goal ({:.2} deg) after {} cycles",
                    act_ctrl.current_physical_position(),
                    ds.num_cycles
                );
            }
        }

        // ---- VELOCITY CONTROL ----

        vel_cmd.execute(&mut vel_ctrl);
        ds.vel_ctrl_output = vel_ctrl.driver().last_dem().copied();
        ds.vel_ctrl_status_rpt = *vel_ctrl.report();

        // ---- WRITE ARCHIVES ----

        write_archives(&mut [
            ("ActCtrl", &mut act_ctrl as &mut dyn Archived),
            ("TgtTrack", &mut tgt_track as &mut dyn Archived),
            ("AimCtrl", aim_cmd.ctrl_mut() as &mut dyn Archived),
            ("VelCtrl", &mut vel_ctrl as &mut dyn Archived),
        ]);

        if ds.is_1_hz_cycle {
            info!(
                "Act {:.1} deg (goal {:.1}), target {}, rot {:.3} rad/s, heading {:.1} deg",
                ds.act_ctrl_status_rpt.position_deg,
                ds.act_ctrl_status_rpt.goal_deg,
                match ds.tgt_track_output.id() {
                    Some(id) => format!("{}", id),
                    None => String::from("none"),
                },
                ds.aim_ctrl_output.rot_rads(),
                world.heading_rad().to_degrees()
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match seconds_to_std(period_s).checked_sub(cycle_dur) {
            Some(d) => {
                ds.record_overrun(false);
                if exec_params.realtime {
                    thread::sleep(d);
                }
            }
            None => {
                warn!("Cycle overran by {:.06} s", cycle_dur.as_secs_f64() - period_s);
                ds.record_overrun(true);
            }
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    info!("Main loop complete, stopping commands");

    {
        let mut ctx = AimContext {
            tracker: &tgt_track,
            drive: &mut world,
            dashboard: &mut ds.dashboard,
            operator_vel_ms: ds.operator_vel_ms,
        };
        aim_cmd.end(&mut ctx, true);
    }
    vel_cmd.end(&mut vel_ctrl, true);
    if let Some(mut c) = act_cmd.take() {
        warn!("Actuator did not reach its goal before the end of execution");
        c.end(&mut act_ctrl, true);
    }

    let dash_path = session.session_root.join("dashboard.json");
    let dash_json = ds.dashboard.to_json().wrap_err("Failed to serialise the dashboard")?;
    std::fs::write(&dash_path, dash_json).wrap_err("Failed to write the dashboard")?;
    info!("Dashboard written to {:?}", dash_path);

    info!(
        "{} cycles executed, {} overruns",
        ds.num_cycles, ds.num_cycle_overruns
    );
    info!("End of execution");

    Ok(())
}

/// Write the archives of each module, warning on failure.
fn write_archives(modules: &mut [(&str, &mut dyn Archived)]) {
    for (name, module) in modules.iter_mut() {
        if let Err(e) = module.write() {
            warn!("Could not write {} archives: {}", name, e);
        }
    }
}
