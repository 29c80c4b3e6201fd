mod articles;
mod memberships;
mod people;

#[cfg(not(feature = "disable-full-text"))]
use articles::articles;
use log::LevelFilter;
use memberships::memberships;
use people::{people, people_deletion};
use quarry::Connection;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub async fn execute_tests<C: Connection>(mut connection: C) {
    people(&mut connection).await;
    people_deletion(&mut connection).await;
    memberships(&mut connection).await;
    #[cfg(not(feature = "disable-full-text"))]
    articles(&mut connection).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
