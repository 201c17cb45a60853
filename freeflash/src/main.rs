use kernel_patcher::MountSequencer;
use log::info;
use std::io::Write;

mod platform;
mod screen;

use screen::{LogScreen, OutcomeScreen, DISPLAY_TIME};

fn main() {
    // setup logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    info!("FreeFlash starting ({})", platform::BACKEND);

    let mut target = platform::open();
    let outcome = MountSequencer::new(&mut target).run();

    LogScreen::new(DISPLAY_TIME, platform::BACKEND).show(&outcome);

    // the outcome is only ever shown, the exit status is always 0
}
