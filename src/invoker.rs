//! # Compression Invoker Module
//!
//! Questo modulo gestisce l'invocazione del comando esterno di compressione.
//!
//! ## Responsabilità:
//! - Materializza lo script Python helper in un file temporaneo per la
//!   durata di una batch (rimosso al drop, best-effort)
//! - Esegue `<python3> <script> <input> <output> <bajo|medio|alto>` per un
//!   singolo file, catturando stdout+stderr combinati
//! - Restituisce la riga di stato grezza SENZA interpretarla: il parsing
//!   appartiene a `CompressionOutcome`
//!
//! ## Contratto:
//! - L'exit status del processo esterno NON viene consultato: conta solo
//!   il testo emesso (grammatica di §outcome)
//! - Se il processo non può proprio partire (interprete mancante), viene
//!   restituita una stringa `ERROR:` che il parser classifica come Failure
//!
//! Il tratto `CompressionInvoker` è il seam iniettabile che permette ai
//! test (e a una UI) di sostituire l'invocazione reale con risposte
//! preconfezionate.

use crate::config::CompressionTier;
use crate::error::CompressError;
use crate::platform::PlatformCommands;
use anyhow::Result;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::debug;

/// Helper script executed by the Python interpreter. Emits exactly one
/// status line on stdout; the tier tokens and EXITO/ADVERTENCIA/ERROR tags
/// are the versioned line grammar shared with the parser.
const COMPRESSION_SCRIPT: &str = r#"import os
import shutil
import subprocess
import sys

from PyPDF2 import PdfReader, PdfWriter


def has_ghostscript():
    try:
        subprocess.run(["gs", "--version"], stdout=subprocess.PIPE,
                       stderr=subprocess.PIPE, check=True)
        return True
    except Exception:
        return False


def compress_with_pypdf(src, dst):
    with open(src, "rb") as fh:
        reader = PdfReader(fh)
        writer = PdfWriter()
        for page in reader.pages:
            page.compress_content_streams()
            writer.add_page(page)
        with open(dst, "wb") as out:
            writer.write(out)
    original = os.path.getsize(src)
    compressed = os.path.getsize(dst)
    if compressed >= original:
        # Never ship a copy larger than the original
        os.remove(dst)
        shutil.copy(src, dst)
        return original, original
    return original, compressed


def compress_with_ghostscript(src, dst):
    cmd = [
        "gs", "-sDEVICE=pdfwrite",
        "-dCompatibilityLevel=1.4",
        "-dPDFSETTINGS=/screen",
        "-dNOPAUSE", "-dQUIET", "-dBATCH",
        "-dColorConversionStrategy=/sRGB",
        "-dDownsampleColorImages=true",
        "-dColorImageDownsampleType=/Bicubic",
        "-dColorImageResolution=72",
        "-dGrayImageDownsampleType=/Bicubic",
        "-dGrayImageResolution=72",
        "-dMonoImageDownsampleType=/Bicubic",
        "-dMonoImageResolution=72",
        "-dAutoRotatePages=/None",
        "-sOutputFile=" + dst,
        src,
    ]
    subprocess.run(cmd, capture_output=True, text=True, check=True)
    return os.path.getsize(src), os.path.getsize(dst)


def main():
    if len(sys.argv) < 4:
        print("ERROR:usage: script.py input.pdf output.pdf [bajo|medio|alto]")
        sys.exit(1)

    src, dst, tier = sys.argv[1], sys.argv[2], sys.argv[3].lower()
    try:
        # Guard against gs disappearing between probe and invocation:
        # degrade here too, and report the tier actually used.
        if tier == "alto" and not has_ghostscript():
            tier = "medio"

        if tier == "alto":
            original, compressed = compress_with_ghostscript(src, dst)
        else:
            original, compressed = compress_with_pypdf(src, dst)

        reduction = 100 - (compressed / original) * 100 if original > 0 else 0
        if reduction <= 0:
            print(f"ADVERTENCIA:{original}:{compressed}:0:{tier}:compresion no efectiva")
        else:
            print(f"EXITO:{original}:{compressed}:{reduction:.2f}:{tier}")
    except Exception as exc:
        print(f"ERROR:{exc}")


if __name__ == "__main__":
    main()
"#;

/// Capability seam over the external compression command
pub trait CompressionInvoker {
    /// Run one compression for one input file at one tier, returning the
    /// raw status text uninterpreted
    fn invoke(&self, input: &Path, output: &Path, tier: CompressionTier) -> String;
}

/// Production invoker: a generated Python script on disk plus the platform
/// interpreter
pub struct ScriptInvoker {
    script: NamedTempFile,
    interpreter: String,
}

impl ScriptInvoker {
    /// Write the helper script to a temp file for the duration of one batch.
    /// The file is removed when the invoker is dropped (best-effort).
    pub fn new() -> Result<Self> {
        let interpreter = PlatformCommands::instance().get_command("python").to_string();
        Self::with_interpreter(interpreter)
    }

    /// Use a specific interpreter binary (also the hook for tests)
    pub fn with_interpreter(interpreter: String) -> Result<Self> {
        let script = tempfile::Builder::new()
            .prefix("pdf_squeeze_")
            .suffix(".py")
            .tempfile()?;
        std::fs::write(script.path(), COMPRESSION_SCRIPT).map_err(CompressError::Io)?;
        debug!("Materialized helper script at {}", script.path().display());

        Ok(Self {
            script,
            interpreter,
        })
    }

    pub fn script_path(&self) -> &Path {
        self.script.path()
    }
}

impl CompressionInvoker for ScriptInvoker {
    fn invoke(&self, input: &Path, output: &Path, tier: CompressionTier) -> String {
        debug!(
            "Invoking compression: {} ({})",
            input.display(),
            tier.wire_token()
        );

        let result = Command::new(&self.interpreter)
            .arg(self.script.path())
            .arg(input)
            .arg(output)
            .arg(tier.wire_token())
            .output();

        match result {
            Ok(out) => {
                // Exit status is deliberately ignored; classification is
                // done on the combined text by the parser.
                let mut combined = String::from_utf8_lossy(&out.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&out.stderr));
                combined.trim().to_string()
            }
            Err(e) => format!("ERROR:failed to start {}: {}", self.interpreter, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CompressionOutcome;

    #[test]
    fn test_script_is_materialized() {
        let invoker = ScriptInvoker::with_interpreter("python3".to_string()).unwrap();

        let written = std::fs::read_to_string(invoker.script_path()).unwrap();
        assert!(written.contains("EXITO"));
        assert!(written.contains("ADVERTENCIA"));
        assert_eq!(
            invoker.script_path().extension().unwrap().to_str(),
            Some("py")
        );
    }

    #[test]
    fn test_script_removed_on_drop() {
        let invoker = ScriptInvoker::with_interpreter("python3".to_string()).unwrap();
        let path = invoker.script_path().to_path_buf();
        assert!(path.exists());

        drop(invoker);
        assert!(!path.exists());
    }

    #[test]
    fn test_unstartable_interpreter_yields_failure_string() {
        let invoker =
            ScriptInvoker::with_interpreter("pdf-squeeze-no-such-interpreter".to_string())
                .unwrap();

        let raw = invoker.invoke(
            Path::new("in.pdf"),
            Path::new("out.pdf"),
            CompressionTier::Advanced,
        );

        assert!(raw.starts_with("ERROR:"));
        assert!(matches!(
            CompressionOutcome::parse(&raw),
            CompressionOutcome::Failure { .. }
        ));
    }
}
