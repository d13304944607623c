//! # Dependency Probes Module
//!
//! Tre controlli indipendenti e read-only sulla presenza dei tool esterni:
//! interprete Python, libreria PyPDF2 importabile, Ghostscript sul PATH.
//! Ogni probe esegue un'invocazione esterna e fa pattern-matching sul
//! testo prodotto, mai sullo stato di uscita da solo.

use crate::platform::PlatformCommands;
use tokio::process::Command;
use tracing::debug;

/// Result of probing the external dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyReport {
    /// Python 3 interpreter present
    pub python: bool,
    /// PyPDF2 importable from that interpreter
    pub pypdf: bool,
    /// Ghostscript present (optional, Ultra tier only)
    pub ghostscript: bool,
}

impl DependencyReport {
    /// The interpreter and the PDF library are required for any batch;
    /// Ghostscript only gates the Ultra tier.
    pub fn essentials_present(&self) -> bool {
        self.python && self.pypdf
    }

    /// Human-readable availability report
    pub fn format_report(&self) -> String {
        let mark = |ok: bool| if ok { "ok" } else { "MISSING" };
        format!(
            "Dependency report:\n  Python 3 interpreter: {}\n  PyPDF2 library: {}\n  Ghostscript (Ultra tier): {}",
            mark(self.python),
            mark(self.pypdf),
            mark(self.ghostscript),
        )
    }
}

/// Run all three probes
pub async fn check_dependencies() -> DependencyReport {
    let report = DependencyReport {
        python: python_available().await,
        pypdf: pypdf_available().await,
        ghostscript: ghostscript_available().await,
    };
    debug!("Probe results: {:?}", report);
    report
}

/// Combined output of a probe invocation, empty when the process cannot run
async fn probe_output(program: &str, args: &[&str]) -> String {
    match Command::new(program).args(args).output().await {
        Ok(out) => {
            let mut combined = String::from_utf8_lossy(&out.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&out.stderr));
            combined.trim().to_string()
        }
        Err(_) => String::new(),
    }
}

pub async fn python_available() -> bool {
    let python = PlatformCommands::instance().get_command("python");
    probe_output(python, &["--version"]).await.contains("Python 3")
}

pub async fn pypdf_available() -> bool {
    let python = PlatformCommands::instance().get_command("python");
    probe_output(python, &["-c", "import PyPDF2; print('OK')"])
        .await
        .contains("OK")
}

pub async fn ghostscript_available() -> bool {
    let gs = PlatformCommands::instance().get_command("gs");
    !probe_output(gs, &["--version"]).await.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essentials_ignore_ghostscript() {
        let report = DependencyReport {
            python: true,
            pypdf: true,
            ghostscript: false,
        };
        assert!(report.essentials_present());

        let report = DependencyReport {
            python: true,
            pypdf: false,
            ghostscript: true,
        };
        assert!(!report.essentials_present());
    }

    #[test]
    fn test_format_report_lists_all_probes() {
        let report = DependencyReport {
            python: true,
            pypdf: false,
            ghostscript: true,
        };
        let text = report.format_report();
        assert!(text.contains("Python 3 interpreter: ok"));
        assert!(text.contains("PyPDF2 library: MISSING"));
        assert!(text.contains("Ghostscript"));
    }

    #[tokio::test]
    async fn test_probe_output_of_missing_program_is_empty() {
        let out = probe_output("pdf-squeeze-no-such-program", &["--version"]).await;
        assert!(out.is_empty());
    }
}
