use std::collections::HashMap;
use std::env;
use std::fs;
use std::time::Duration;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ConfigFile {
    pub elevator: HashMap<String, u8>,
    pub timing: HashMap<String, f64>,
    pub network: HashMap<String, u16>,
    pub input: HashMap<String, String>,
}

/// Fixed simulation parameters. Passed by value into every constructor so
/// independent simulations can run with different settings in one process.
#[derive(Debug, Clone, Copy)]
pub struct SystemConfig {
    pub num_floors: u8,
    pub num_elevators: u8,
    pub travel_time: f64,
    pub load_time: f64,
}

impl SystemConfig {
    pub fn travel_duration(&self) -> Duration {
        Duration::from_secs_f64(self.travel_time)
    }

    pub fn load_duration(&self) -> Duration {
        Duration::from_secs_f64(self.load_time)
    }
}

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub monitor_port: u16,
}

#[derive(Debug, Clone)]
pub struct InputConfig {
    pub requests_path: String,
}

fn read_config_file() -> Result<ConfigFile, serde_json::Error> {
    let file_path = "config.json";
    let fallback_file_path = "_config.json";
    let config_contents = match fs::read_to_string(file_path) {
        Ok(content) => content,
        Err(_) => {
            println!("No configuration file provided, using default settings...");
            fs::read_to_string(fallback_file_path).unwrap()
        }
    };
    parse_config(&config_contents)
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, serde_json::Error> {
    serde_json::from_str(contents)
}

fn parse_env_args(default_input: String, default_port: u16) -> (String, u16) {
    let (mut input, mut monitor_port) = (default_input, default_port);

    let args: Vec<String> = env::args().collect();
    for arg_pair in args.rchunks_exact(2) {
        match arg_pair[0].as_str() {
            "--input" => {
                input = arg_pair[1].clone();
            }
            "--monitorport" => {
                monitor_port = match arg_pair[1].parse::<u16>() {
                    Ok(port) => port,
                    Err(_) => {
                        println!("port {} is not a number, skipping...", arg_pair[1]);
                        monitor_port
                    }
                };
            }
            _ => {
                println!("illegal argument {}, skipping...", arg_pair[0]);
            }
        }
    }
    (input, monitor_port)
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub system: SystemConfig,
    pub network: NetworkConfig,
    pub input: InputConfig,
}

impl ControllerConfig {
    pub fn get() -> Self {
        let config_file = read_config_file().unwrap();
        let (requests_path, monitor_port) = parse_env_args(
            config_file.input["requests_path"].clone(),
            config_file.network["monitor_port"],
        );

        ControllerConfig {
            system: SystemConfig {
                num_floors: config_file.elevator["num_floors"],
                num_elevators: config_file.elevator["num_elevators"],
                travel_time: config_file.timing["travel_time"],
                load_time: config_file.timing["load_time"],
            },
            network: NetworkConfig { monitor_port },
            input: InputConfig { requests_path },
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub network: NetworkConfig,
}

impl MonitorConfig {
    pub fn get() -> Self {
        let config_file = read_config_file().unwrap();
        let (_, monitor_port) = parse_env_args(
            String::new(),
            config_file.network["monitor_port"],
        );

        MonitorConfig {
            network: NetworkConfig { monitor_port },
        }
    }
}
