// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{AppConfig, FsOps};
use crate::editor::{parse_list, ListField, PersonalField};
use crate::export::{ExportPipeline, MemoryClipboard, Rasterizer};
use crate::session::ResumeSession;
use crate::suggestions::Suggestion;
use crate::template_system::list_templates;
use crate::types::response::DocumentFormat;
use crate::types::{default_document, ResumeDocument};

#[derive(Parser)]
#[command(name = "resume-builder")]
#[command(about = "Edit a resume, preview it and export it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Resume document (.json or .toml)
    #[arg(long, global = true, default_value = "resume.json")]
    pub document: PathBuf,

    /// Template for preview and export: modern, classic, minimalist, creative
    #[arg(long, short, global = true)]
    pub template: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a blank resume document
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Set a personal info field (name, title, email, phone, location, summary)
    Set { field: String, value: String },
    /// Set a field of one list entry
    SetEntry {
        list: String,
        index: usize,
        field: String,
        value: String,
    },
    /// Append a blank entry to a list
    Add { list: String },
    /// Remove a list entry. The last entry of a list is kept.
    Remove { list: String, index: usize },
    /// Apply a suggestion by field path: summary, newSkill, experience-<i>-description
    Suggest {
        field_path: String,
        value: String,
        /// Fail on unknown paths and bad indices instead of ignoring them
        #[arg(long)]
        strict: bool,
    },
    /// List available templates
    Templates,
    /// Print the preview, or rasterize it to a PNG file
    Preview {
        #[arg(long)]
        png: Option<PathBuf>,
    },
    /// Check the document for problems
    Validate,
    /// Export a one-page PDF into the output directory
    ExportPdf,
    /// Request a DOCX export from the resume service
    ExportDocx,
    /// Generate a share link
    Share,
    /// Save the resume to your account
    Save,
}

async fn load_or_default(path: &Path) -> Result<ResumeDocument> {
    if path.exists() {
        FsOps::load_document(path).await
    } else {
        info!("{} not found, starting from a blank resume", path.display());
        Ok(default_document())
    }
}

pub async fn handle_command(cli: Cli, config: &AppConfig) -> Result<()> {
    let document = match &cli.command {
        Command::Init { .. } => default_document(),
        _ => load_or_default(&cli.document).await?,
    };

    let pipeline = ExportPipeline::from_config(config, Arc::new(MemoryClipboard::new()))?;
    let session = ResumeSession::with_document(document, pipeline);
    if let Some(id) = &cli.template {
        session.select_template_by_id(id)?;
    }

    let revision = session.revision();

    match cli.command {
        Command::Init { force } => {
            if cli.document.exists() && !force {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite it",
                    cli.document.display()
                );
            }
            FsOps::save_document(&cli.document, &session.document()).await?;
            println!("✓ Created {}", cli.document.display());
            return Ok(());
        }

        Command::Set { field, value } => {
            let field = PersonalField::parse(&field)?;
            session.editor().set_personal_field(field, value);
        }

        Command::SetEntry {
            list,
            index,
            field,
            value,
        } => {
            let field = ListField::parse(parse_list(&list)?, &field)?;
            session.editor().set_list_field(field, index, value)?;
        }

        Command::Add { list } => {
            let list = parse_list(&list)?;
            let doc = session.editor().add_entry(list);
            println!("✓ Added {} entry #{}", list, doc.list_len(list) - 1);
        }

        Command::Remove { list, index } => {
            let list = parse_list(&list)?;
            let before = session.document().list_len(list);
            session.editor().remove_entry(list, index)?;
            if before == 1 {
                println!("A resume keeps at least one {} entry, nothing removed", list);
            }
        }

        Command::Suggest {
            field_path,
            value,
            strict,
        } => {
            if strict {
                let suggestion = Suggestion::from_field_path(&field_path, &value)
                    .with_context(|| format!("Unrecognized field path: {}", field_path))?;
                session.apply_suggestion(&suggestion)?;
            } else {
                session.apply_field_path(&field_path, &value);
            }
        }

        Command::Templates => {
            let selected = session.template();
            for (id, manifest) in list_templates() {
                let marker = if id == selected { "*" } else { " " };
                println!(
                    "{} {:<11} {:<12} {}",
                    marker, id.as_str(), manifest.name, manifest.description
                );
            }
        }

        Command::Preview { png } => match png {
            Some(path) => {
                if FsOps::get_extension(&path).as_deref() != Some("png") {
                    anyhow::bail!("Preview images are PNG only: {}", path.display());
                }
                let bitmap = Rasterizer::default().rasterize(&session.preview())?;
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        FsOps::ensure_dir_exists(parent).await?;
                    }
                }
                bitmap
                    .save(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!(
                    "✓ Preview written to {} ({}x{})",
                    path.display(),
                    bitmap.width(),
                    bitmap.height()
                );
            }
            None => print!("{}", session.preview().to_plain_text()),
        },

        Command::Validate => {
            let issues = session.document().validate();
            if issues.is_empty() {
                println!("✓ {} is valid", cli.document.display());
            } else {
                for issue in &issues {
                    println!("✗ {}", issue);
                }
                anyhow::bail!("{} issue(s) found", issues.len());
            }
        }

        Command::ExportPdf => {
            let artifact = session.export_pdf().await?;
            println!("✓ PDF written to {}", artifact.location.display());
        }

        Command::ExportDocx => {
            let generated = session.export_document(DocumentFormat::Docx).await?;
            match (&generated.content, &generated.download_url) {
                (Some(_), _) => println!(
                    "✓ {} written to {}",
                    generated.filename,
                    config.output_dir.display()
                ),
                (None, Some(url)) => println!("✓ {} available at {}", generated.filename, url),
                (None, None) => println!("✓ {} requested", generated.filename),
            }
        }

        Command::Share => {
            let link = session.share_link()?;
            println!("{}", link);
        }

        Command::Save => {
            let response = session.save_to_account().await?;
            match response.id {
                Some(id) => println!("✓ Saved to your account (id {})", id),
                None => println!("✓ Saved to your account"),
            }
        }
    }

    if session.revision() != revision {
        FsOps::save_document(&cli.document, &session.document()).await?;
        info!("Saved {}", cli.document.display());
    } else if !cli.document.exists() {
        warn!("{} does not exist yet, run `init` to create it", cli.document.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("resume-builder").chain(args.iter().copied()))
            .unwrap()
    }

    fn config(dir: &Path) -> AppConfig {
        AppConfig {
            output_dir: dir.join("out"),
            simulated_delay_ms: 0,
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_global_document_flag() {
        let parsed = cli(&["set", "name", "Jane Doe", "--document", "cv.toml"]);
        assert_eq!(parsed.document, PathBuf::from("cv.toml"));
        assert!(matches!(parsed.command, Command::Set { .. }));

        let parsed = cli(&["templates"]);
        assert_eq!(parsed.document, PathBuf::from("resume.json"));
    }

    #[tokio::test]
    async fn test_edit_commands_persist() {
        let tmp = tempfile::tempdir().unwrap();
        let doc = tmp.path().join("resume.json");
        let doc_arg = doc.to_string_lossy().to_string();
        let config = config(tmp.path());

        handle_command(cli(&["--document", &doc_arg, "init"]), &config)
            .await
            .unwrap();
        handle_command(cli(&["--document", &doc_arg, "set", "name", "Jane Doe"]), &config)
            .await
            .unwrap();
        handle_command(cli(&["--document", &doc_arg, "add", "skills"]), &config)
            .await
            .unwrap();
        handle_command(
            cli(&["--document", &doc_arg, "set-entry", "skills", "1", "name", "Rust"]),
            &config,
        )
        .await
        .unwrap();

        let saved = FsOps::load_document(&doc).await.unwrap();
        assert_eq!(saved.personal_info.name, "Jane Doe");
        assert_eq!(saved.skills.len(), 2);
        assert_eq!(saved.skills[1].name, "Rust");
        assert_eq!(saved.skills[1].level, "80");

        let again = handle_command(cli(&["--document", &doc_arg, "init"]), &config).await;
        assert!(again.is_err());
    }

    #[tokio::test]
    async fn test_export_pdf_writes_to_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let doc = tmp.path().join("resume.json");
        let doc_arg = doc.to_string_lossy().to_string();
        let config = config(tmp.path());

        handle_command(cli(&["--document", &doc_arg, "set", "name", "Jane Doe"]), &config)
            .await
            .unwrap();
        handle_command(cli(&["--document", &doc_arg, "export-pdf"]), &config)
            .await
            .unwrap();

        let pdf = tokio::fs::read(tmp.path().join("out").join("Jane Doe.pdf"))
            .await
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_strict_suggestion_rejects_unknown_path() {
        let tmp = tempfile::tempdir().unwrap();
        let doc_arg = tmp.path().join("resume.json").to_string_lossy().to_string();
        let config = config(tmp.path());

        let result = handle_command(
            cli(&["--document", &doc_arg, "suggest", "experience-0-title", "CTO", "--strict"]),
            &config,
        )
        .await;
        assert!(result.is_err());

        handle_command(
            cli(&["--document", &doc_arg, "suggest", "experience-0-title", "CTO"]),
            &config,
        )
        .await
        .unwrap();
        assert!(!tmp.path().join("resume.json").exists());
    }

    #[tokio::test]
    async fn test_preview_png_requires_png_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let doc_arg = tmp.path().join("resume.json").to_string_lossy().to_string();
        let config = config(tmp.path());

        let txt = tmp.path().join("preview.txt").to_string_lossy().to_string();
        let args = ["--document", doc_arg.as_str(), "preview", "--png", txt.as_str()];
        assert!(handle_command(cli(&args), &config).await.is_err());
        assert!(!tmp.path().join("preview.txt").exists());

        let png = tmp.path().join("shots").join("preview.png");
        let png_arg = png.to_string_lossy().to_string();
        handle_command(cli(&["--document", &doc_arg, "preview", "--png", &png_arg]), &config)
            .await
            .unwrap();
        assert!(png.exists());
    }
}
