use std::sync::Once;


static INIT: Once = Once::new();

pub fn setup_logging() {
    INIT.call_once(|| {
        env_logger::builder().is_test(true).init();
    });
}
