use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use projdeck_types::ScanWarning;

/// Print one warning line to stderr. Warnings never change the exit code.
pub fn warning(w: &ScanWarning) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {}", "warning:".yellow().bold(), w);
    } else {
        eprintln!("warning: {}", w);
    }
}

pub fn warnings(ws: &[ScanWarning]) {
    for w in ws {
        warning(w);
    }
}

pub fn success(msg: &str) {
    if std::io::stdout().is_terminal() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}
