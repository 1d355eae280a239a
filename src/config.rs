use std::env;
use std::fs;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
struct ConfigFile {
    light: LightConfig,
    simulation: SimConfig,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct LightConfig {
    pub min_phase_secs: f64,
    pub max_phase_secs: f64,
    pub poll_interval_ms: u64,
}

impl Default for LightConfig {
    fn default() -> Self {
        LightConfig {
            min_phase_secs: 4.0,
            max_phase_secs: 6.0,
            poll_interval_ms: 1,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct SimConfig {
    pub num_vehicles: u8,
    pub run_secs: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            num_vehicles: 4,
            run_secs: 30,
        }
    }
}

fn read_config_file() -> Result<ConfigFile, serde_json::Error> {
    let file_path = "config.json";
    match fs::read_to_string(file_path) {
        Ok(contents) => serde_json::from_str(&contents),
        Err(_) => {
            println!("No configuration file provided, using default settings...");
            Ok(ConfigFile {
                light: LightConfig::default(),
                simulation: SimConfig::default(),
            })
        }
    }
}

fn parse_env_args(mut simulation: SimConfig) -> SimConfig {
    let args: Vec<String> = env::args().collect();
    for arg_pair in args.rchunks_exact(2) {
        match arg_pair[0].as_str() {
            "--vehicles" => {
                simulation.num_vehicles = match arg_pair[1].parse::<u8>() {
                    Ok(num) => num,
                    Err(_) => {
                        println!("vehicle count {} is not a number, skipping...", arg_pair[1]);
                        simulation.num_vehicles
                    }
                };
            }
            "--run-secs" => {
                simulation.run_secs = match arg_pair[1].parse::<u64>() {
                    Ok(num) => num,
                    Err(_) => {
                        println!("run duration {} is not a number, skipping...", arg_pair[1]);
                        simulation.run_secs
                    }
                };
            }
            _ => {}
        }
    }
    simulation
}

#[derive(Debug, Clone)]
pub struct Config {
    pub light: LightConfig,
    pub sim: SimConfig,
}

impl Config {
    pub fn get() -> Self {
        let config_file = match read_config_file() {
            Ok(config_file) => config_file,
            Err(e) => {
                println!("Configuration file is malformed ({}), using default settings...", e);
                ConfigFile {
                    light: LightConfig::default(),
                    simulation: SimConfig::default(),
                }
            }
        };

        let mut light = config_file.light;
        if !(light.min_phase_secs > 0.0 && light.min_phase_secs < light.max_phase_secs) {
            println!("Invalid phase durations in configuration, using default settings...");
            light = LightConfig::default();
        }
        if light.poll_interval_ms == 0 {
            light.poll_interval_ms = LightConfig::default().poll_interval_ms;
        }

        Config {
            light,
            sim: parse_env_args(config_file.simulation),
        }
    }
}
