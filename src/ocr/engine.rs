use anyhow::{Result, anyhow};
use image::GrayImage;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::{find_tessdata_dir, find_tesseract_executable};
use super::{OcrBackend, OcrToken};

/// Keeps runs of spaces Tesseract would otherwise collapse between words.
const PRESERVE_SPACES: &str = "preserve_interword_spaces=1";

/// Tesseract's `<base>.tsv` output, removed when dropped.
struct TsvOutput(PathBuf);

impl Drop for TsvOutput {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

/// Tesseract command-line backend.
#[derive(Debug, Clone)]
pub struct Tesseract {
    executable: PathBuf,
    tessdata: Option<PathBuf>,
}

impl Tesseract {
    /// Locates the executable and language data, honouring configured overrides.
    pub fn locate(executable: Option<&Path>, tessdata: Option<&Path>) -> Result<Self> {
        let executable = find_tesseract_executable(executable)?;
        let tessdata = find_tessdata_dir(tessdata);
        crate::log(&format!(
            "Using Tesseract at {} (tessdata: {})",
            executable.display(),
            tessdata
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "default".to_string())
        ));
        Ok(Self {
            executable,
            tessdata,
        })
    }

    fn command(&self, input: &Path, output: &str, lang: &str) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(input).arg(output);
        if let Some(dir) = &self.tessdata {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd.arg("-l").arg(lang).arg("-c").arg(PRESERVE_SPACES);
        cmd
    }
}

impl OcrBackend for Tesseract {
    /// Runs Tesseract to stdout and returns the raw text.
    fn recognize_text(&self, img: &GrayImage, lang: &str) -> Result<String> {
        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())?;

        let output = self.command(temp_input.path(), "stdout", lang).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Runs Tesseract with TSV output and returns the word-level boxes.
    fn recognize_tokens(&self, img: &GrayImage, lang: &str) -> Result<Vec<OcrToken>> {
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())?;

        // Tesseract appends .tsv to the output base
        let temp_output = NamedTempFile::new()?;
        let output_base = temp_output.path().to_string_lossy().to_string();
        let tsv = TsvOutput(PathBuf::from(format!("{}.tsv", output_base)));

        let output = self
            .command(temp_input.path(), &output_base, lang)
            .arg("tsv")
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        let tsv_content = std::fs::read_to_string(&tsv.0)
            .map_err(|e| anyhow!("Failed to read Tesseract output: {}", e))?;

        Ok(parse_tsv_output(&tsv_content))
    }
}

/// Parses Tesseract TSV output into word tokens.
///
/// TSV fields: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text. Only level 5 (word) rows with
/// non-empty text are kept.
fn parse_tsv_output(tsv: &str) -> Vec<OcrToken> {
    let mut tokens = Vec::new();

    for line in tsv.lines().skip(1) {
        // Skip header
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        if level != 5 {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let num = |i: usize| fields[i].parse::<i32>().unwrap_or(0);
        tokens.push(OcrToken {
            text: text.to_string(),
            left: num(6),
            top: num(7),
            width: num(8),
            height: num(9),
            confidence: fields[10].parse().unwrap_or(-1.0),
        });
    }

    tokens
}
