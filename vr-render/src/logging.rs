use log::LevelFilter;
use std::sync::Once;

static INIT: Once = Once::new();

// Installs a stdout logger. Later calls, or a logger installed by the
// application beforehand, leave the current backend in place.
pub fn init_logging() {
    INIT.call_once(|| {
        let dispatch = if cfg!(debug_assertions) {
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} [{}] in {}@{}: {}",
                        chrono::Local::now().format("%H:%M:%S.%f"),
                        record.level(),
                        record.file().unwrap_or("?"),
                        record.line().unwrap_or(0),
                        message
                    ))
                })
                .level(LevelFilter::Trace)
        } else {
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} [{}] {}",
                        chrono::Local::now().format("%H:%M:%S.%f"),
                        record.level(),
                        message
                    ))
                })
                .level(LevelFilter::Info)
        };

        if let Err(e) = dispatch.chain(std::io::stdout()).apply() {
            eprintln!("Logger already installed: {}", e);
        }
    });
}
