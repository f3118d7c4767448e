use clap::{value_parser, Arg, Command};
use crossbeam_channel::{select, tick};
use sick_tim_driver::{run_driver, DriverConfig, SickError};
use std::time::Duration;

const PRINT_INTERVAL: Duration = Duration::from_millis(500);

fn get_config() -> Result<DriverConfig, SickError> {
    let matches = Command::new("LiDAR data receiver.")
        .about("Reads filtered scans from a SICK TiM sensor.")
        .disable_version_flag(true)
        .arg(
            Arg::new("address")
                .help("Sensor address such as 192.168.0.1:2112")
                .use_value_delimiter(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("view-angle")
                .long("view-angle")
                .help("Centered field of view to keep, in degree")
                .value_parser(value_parser!(f64)),
        )
        .get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => DriverConfig::from_file(path)?,
        None => DriverConfig::default(),
    };
    if let Some(address) = matches.get_one::<String>("address") {
        config.sensor.address = address.clone();
    }
    if let Some(view_angle) = matches.get_one::<f64>("view-angle") {
        config.filter.view_angle = *view_angle;
    }
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match get_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    let driver = match run_driver(&config) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("Failed to start the lidar at \"{}\". Error: {e}", config.sensor.address);
            std::process::exit(1);
        }
    };

    let ticker = tick(PRINT_INTERVAL);
    loop {
        select! {
            recv(ticker) -> _ => match driver.latest() {
                Some(scan) => match serde_json::to_string(&scan) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("{e}"),
                },
                None => println!("null"),
            },
            recv(driver.result_receiver()) -> result => {
                match result {
                    Ok(Ok(summary)) => eprintln!("Lidar stream ended: {summary:?}"),
                    Ok(Err(e)) => eprintln!("Lidar connection lost: {e}"),
                    Err(_) => {}
                }
                break;
            }
        }
    }

    drop(driver);
}
