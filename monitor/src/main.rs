use std::thread;

use crossbeam_channel::unbounded;

use shared_resources::config::MonitorConfig;
use transport::udpnet::bcast::{self, RxError};

pub mod display;

fn main() {
    env_logger::init();

    // READ CONFIGURATION
    let config = MonitorConfig::get();

    // INITIALIZE STATUS RECEIVER THREAD
    let (status_tx, status_rx) = unbounded();
    {
        let monitor_port = config.network.monitor_port;
        thread::spawn(move || {
            if let Err(e) = bcast::rx(monitor_port, status_tx) {
                match e {
                    RxError::IoError(e) => log::error!("status receiver stopped: {}", e),
                    RxError::ChannelSendError(_) => (),
                }
            }
        });
    }

    // RUN THE DISPLAY ON THE MAIN THREAD
    if let Err(e) = display::main(status_rx) {
        log::error!("display stopped: {}", e);
    }
}
