//! Folder-wide translation of dialogue documents

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use super::Translator;
use super::dictionary::Dictionary;
use crate::config::TranslationSettings;
use crate::document::{Block, Document, find_json_files};
use crate::error::{Error, Result, TranslationError};
use crate::utils::{contains_japanese, truncate_display};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Translate every field again, ignoring existing targets
    pub force: bool,
    pub context_lines: usize,
    pub request_delay: Duration,
    pub clean_monologue: bool,
    pub dictionary_names_verbatim: bool,
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            force: false,
            context_lines: 0,
            request_delay: Duration::ZERO,
            clean_monologue: true,
            dictionary_names_verbatim: false,
            show_progress: false,
        }
    }
}

impl PipelineOptions {
    pub fn from_settings(settings: &TranslationSettings) -> Self {
        Self {
            context_lines: settings.context_lines,
            request_delay: Duration::from_millis(settings.request_delay_ms),
            clean_monologue: settings.clean_monologue,
            dictionary_names_verbatim: settings.dictionary_names_verbatim,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Text,
    Choice(usize),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "enName"),
            Self::Text => write!(f, "enText"),
            Self::Choice(i) => write!(f, "choice {} enText", i + 1),
        }
    }
}

/// Location of one target field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub path: PathBuf,
    pub block_idx: i64,
    pub field: Field,
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (blockIdx {}, {})",
            self.path.display(),
            self.block_idx,
            self.field
        )
    }
}

#[derive(Debug)]
pub struct FieldFailure {
    pub location: FieldRef,
    pub error: TranslationError,
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct PipelineReport {
    pub files_processed: usize,
    pub files_failed: Vec<FileFailure>,
    pub names_translated: usize,
    pub texts_translated: usize,
    pub choices_translated: usize,
    /// Targets that were already filled and left alone
    pub fields_reused: usize,
    pub field_failures: Vec<FieldFailure>,
    /// Translations that still contain Japanese characters
    pub japanese_residue: Vec<FieldRef>,
}

impl PipelineReport {
    pub fn fields_translated(&self) -> usize {
        self.names_translated + self.texts_translated + self.choices_translated
    }

    pub fn print_summary(&self) {
        println!();
        println!("{}", "[Translate] Summary".green());
        println!("  Files processed:    {}", self.files_processed);
        println!(
            "  Fields translated:  {} ({} names, {} texts, {} choices)",
            self.fields_translated(),
            self.names_translated,
            self.texts_translated,
            self.choices_translated
        );
        println!("  Already translated: {}", self.fields_reused);

        if !self.files_failed.is_empty() {
            println!(
                "{}",
                format!("  Failed files: {}", self.files_failed.len()).red()
            );
            for failure in &self.files_failed {
                println!("    {}: {}", failure.path.display(), failure.error);
            }
        }

        if !self.field_failures.is_empty() {
            println!(
                "{}",
                format!("  Failed fields: {}", self.field_failures.len()).red()
            );
            for failure in &self.field_failures {
                println!("    {}: {}", failure.location, failure.error);
            }
        }

        if !self.japanese_residue.is_empty() {
            println!(
                "{}",
                format!(
                    "  [WARN] {} translation(s) still contain Japanese",
                    self.japanese_residue.len()
                )
                .yellow()
            );
            for location in self.japanese_residue.iter().take(20) {
                println!("    {}", location);
            }
            if self.japanese_residue.len() > 20 {
                println!("    ... and {} more", self.japanese_residue.len() - 20);
            }
        }
    }
}

#[derive(Debug, Default)]
struct FileStats {
    names: usize,
    texts: usize,
    choices: usize,
}

/// Sliding window of the previous blocks in the current file
struct ContextWindow {
    capacity: usize,
    lines: VecDeque<ContextLine>,
}

struct ContextLine {
    jp_name: String,
    jp_text: String,
    en_name: String,
    en_text: String,
}

impl ContextWindow {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
        }
    }

    fn push(&mut self, block: &Block) {
        if self.capacity == 0 {
            return;
        }
        self.lines.push_back(ContextLine {
            jp_name: block.jp_name.clone(),
            jp_text: block.jp_text.clone(),
            en_name: block.en_name.clone(),
            en_text: block.en_text.clone(),
        });
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    fn render(&self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .lines
            .iter()
            .map(|l| {
                if l.en_text.is_empty() {
                    format!("{}: {}", l.jp_name, l.jp_text)
                } else {
                    format!(
                        "{}: {}\n[Translation]: {}: {}",
                        l.jp_name, l.jp_text, l.en_name, l.en_text
                    )
                }
            })
            .collect();
        Some(format!(
            "Previous dialogue for context:\n{}\n\nNow translate:",
            parts.join("\n")
        ))
    }
}

pub struct Pipeline<'a> {
    translator: &'a dyn Translator,
    dictionary: &'a Dictionary,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        translator: &'a dyn Translator,
        dictionary: &'a Dictionary,
        options: PipelineOptions,
    ) -> Self {
        Self {
            translator,
            dictionary,
            options,
        }
    }

    /// Translates every JSON document under `input_root` into the mirrored
    /// path under `output_root`. A file that fails is recorded and skipped.
    pub fn run(&self, input_root: &Path, output_root: &Path) -> Result<PipelineReport> {
        if !input_root.is_dir() {
            return Err(Error::Config(format!(
                "Input folder does not exist: {}",
                input_root.display()
            )));
        }

        let mut report = PipelineReport::default();
        let files = find_json_files(input_root);

        if files.is_empty() {
            println!(
                "{}",
                format!("[WARN] No JSON files found in {}", input_root.display()).yellow()
            );
            return Ok(report);
        }

        println!(
            "{}",
            format!("[Translate] Found {} JSON file(s)", files.len()).green()
        );
        if self.options.context_lines > 0 {
            println!(
                "  Using {} previous line(s) as context",
                self.options.context_lines
            );
        }

        let pb = if self.options.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };

        for path in files {
            let rel_path = path.strip_prefix(input_root).unwrap_or(&path).to_path_buf();
            pb.set_message(rel_path.display().to_string());

            let out_path = output_root.join(&rel_path);
            match self.translate_file(&path, &rel_path, &out_path, &pb, &mut report) {
                Ok(stats) => {
                    report.files_processed += 1;
                    report.names_translated += stats.names;
                    report.texts_translated += stats.texts;
                    report.choices_translated += stats.choices;
                    pb.suspend(|| {
                        println!(
                            "{}",
                            format!(
                                "[OK] {} -> {} ({} field(s) translated)",
                                rel_path.display(),
                                out_path.display(),
                                stats.names + stats.texts + stats.choices
                            )
                            .green()
                        );
                    });
                }
                Err(e) => {
                    tracing::error!("Skipping {}: {}", path.display(), e);
                    pb.suspend(|| {
                        eprintln!(
                            "{}",
                            format!("[ERROR] Failed to translate {}: {}", rel_path.display(), e)
                                .red()
                        );
                    });
                    report.files_failed.push(FileFailure {
                        path: rel_path,
                        error: e,
                    });
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(report)
    }

    fn translate_file(
        &self,
        path: &Path,
        rel_path: &Path,
        out_path: &Path,
        pb: &ProgressBar,
        report: &mut PipelineReport,
    ) -> Result<FileStats> {
        let mut doc = Document::load(path)?;

        if !self.options.force && out_path.exists() {
            match Document::load(out_path) {
                Ok(previous) => carry_over(&previous, &mut doc),
                Err(e) => tracing::warn!("Ignoring unreadable previous output: {}", e),
            }
        }

        let mut stats = FileStats::default();
        let mut context = ContextWindow::new(self.options.context_lines);

        for block in doc.text.iter_mut() {
            let block_idx = block.block_idx;
            let location = |field| FieldRef {
                path: rel_path.to_path_buf(),
                block_idx,
                field,
            };

            if has_source(&block.jp_name) {
                if self.needs_translation(&block.en_name) {
                    if let Some(t) =
                        self.translate_field(&block.jp_name, None, location(Field::Name), report)
                    {
                        block.en_name = t;
                        stats.names += 1;
                    }
                } else {
                    report.fields_reused += 1;
                }
            }

            if has_source(&block.jp_text) {
                if self.needs_translation(&block.en_text) {
                    let ctx = context.render();
                    tracing::debug!("[{}] {}", block_idx, truncate_display(&block.jp_text, 50));
                    if let Some(t) = self.translate_field(
                        &block.jp_text,
                        ctx.as_deref(),
                        location(Field::Text),
                        report,
                    ) {
                        block.en_text = t;
                        stats.texts += 1;
                    }
                } else {
                    report.fields_reused += 1;
                }
            }

            context.push(block);
            let ctx = context.render();

            for (i, choice) in block.choices.iter_mut().enumerate() {
                if !has_source(&choice.jp_text) {
                    continue;
                }
                if !self.needs_translation(&choice.en_text) {
                    report.fields_reused += 1;
                    continue;
                }
                let location = FieldRef {
                    path: rel_path.to_path_buf(),
                    block_idx,
                    field: Field::Choice(i),
                };
                if let Some(t) =
                    self.translate_field(&choice.jp_text, ctx.as_deref(), location, report)
                {
                    choice.en_text = t;
                    stats.choices += 1;
                }
            }
        }

        doc.save(out_path)?;
        Ok(stats)
    }

    fn needs_translation(&self, target: &str) -> bool {
        self.options.force || target.is_empty()
    }

    /// Dictionary pass, then the model. `None` means the call failed and the
    /// target must stay as it is.
    fn translate_field(
        &self,
        source: &str,
        context: Option<&str>,
        location: FieldRef,
        report: &mut PipelineReport,
    ) -> Option<String> {
        let prepared = self.dictionary.apply(source);
        let is_name = location.field == Field::Name;

        if is_name && self.options.dictionary_names_verbatim && prepared != source {
            return Some(prepared);
        }

        let result = self.translator.translate(&prepared, context);
        if !self.options.request_delay.is_zero() {
            thread::sleep(self.options.request_delay);
        }

        match result {
            Ok(mut translated) => {
                if is_name
                    && self.options.clean_monologue
                    && translated.trim().eq_ignore_ascii_case("monologue")
                {
                    translated.clear();
                }
                if contains_japanese(&translated) {
                    tracing::debug!("Translation still contains Japanese: {}", location);
                    report.japanese_residue.push(location);
                }
                Some(translated)
            }
            Err(error) => {
                tracing::warn!("Translation failed for {}: {}", location, error);
                report.field_failures.push(FieldFailure { location, error });
                None
            }
        }
    }
}

fn has_source(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Fills empty targets from an earlier output of the same document. A value is
/// only taken when its source text is unchanged.
fn carry_over(previous: &Document, doc: &mut Document) {
    let by_idx: HashMap<i64, &Block> = previous.text.iter().map(|b| (b.block_idx, b)).collect();

    for block in &mut doc.text {
        let Some(prev) = by_idx.get(&block.block_idx) else {
            continue;
        };
        adopt(&mut block.en_name, &block.jp_name, &prev.jp_name, &prev.en_name);
        adopt(&mut block.en_text, &block.jp_text, &prev.jp_text, &prev.en_text);
        for (choice, prev_choice) in block.choices.iter_mut().zip(&prev.choices) {
            adopt(
                &mut choice.en_text,
                &choice.jp_text,
                &prev_choice.jp_text,
                &prev_choice.en_text,
            );
        }
    }
}

fn adopt(target: &mut String, source: &str, prev_source: &str, prev_target: &str) {
    if source == prev_source && !prev_target.is_empty() {
        *target = prev_target.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    enum Mode {
        Uppercase,
        Fixed(&'static str),
    }

    struct StubTranslator {
        mode: Mode,
        fail_on: Option<&'static str>,
        calls: RefCell<Vec<(String, Option<String>)>>,
    }

    impl StubTranslator {
        fn new(mode: Mode) -> Self {
            Self {
                mode,
                fail_on: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Translator for StubTranslator {
        fn translate(
            &self,
            text: &str,
            context: Option<&str>,
        ) -> std::result::Result<String, TranslationError> {
            self.calls
                .borrow_mut()
                .push((text.to_string(), context.map(str::to_string)));
            if self.fail_on == Some(text) {
                return Err(TranslationError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(match self.mode {
                Mode::Uppercase => text.to_uppercase(),
                Mode::Fixed(s) => s.to_string(),
            })
        }
    }

    struct Dirs {
        _temp: TempDir,
        input: PathBuf,
        output: PathBuf,
    }

    fn dirs_with(files: &[(&str, &str)]) -> Dirs {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("raw_umatl");
        let output = temp.path().join("slop");
        for (rel, content) in files {
            let path = input.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        fs::create_dir_all(&input).unwrap();
        Dirs {
            _temp: temp,
            input,
            output,
        }
    }

    const SCENE: &str = r#"{"text":[
        {"blockIdx":1,"jpName":"ウマ娘","enName":"","jpText":"こんにちは","enText":"","choices":[]},
        {"blockIdx":5,"jpName":"","enName":"","jpText":"どうする？","enText":"",
         "choices":[{"jpText":"走る","enText":""},{"jpText":"休む","enText":""}]}
    ]}"#;

    #[test]
    fn test_dictionary_runs_before_translation() {
        let dirs = dirs_with(&[(
            "story.json",
            r#"{"text":[{"blockIdx":1,"jpName":"ウマ娘","enName":"","jpText":"こんにちは","enText":"","choices":[]}]}"#,
        )]);
        let stub = StubTranslator::new(Mode::Uppercase);
        let dictionary =
            Dictionary::from_pairs([("ウマ娘".to_string(), "Umamusume".to_string())]);

        let report = Pipeline::new(&stub, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();

        let doc = Document::load(dirs.output.join("story.json")).unwrap();
        assert_eq!(doc.text[0].en_name, "UMAMUSUME");
        assert_eq!(doc.text[0].en_text, "こんにちは".to_uppercase());
        assert_eq!(stub.calls.borrow()[0].0, "Umamusume");
        assert_eq!(report.files_processed, 1);
        assert_eq!(report.names_translated, 1);
        assert_eq!(report.texts_translated, 1);
    }

    #[test]
    fn test_empty_source_makes_no_call() {
        let dirs = dirs_with(&[(
            "a.json",
            r#"{"text":[{"blockIdx":9,"jpName":"","enName":"","jpText":"","enText":"","choices":[{"jpText":"","enText":""}]}]}"#,
        )]);
        let stub = StubTranslator::new(Mode::Fixed("X"));
        let dictionary = Dictionary::new();

        Pipeline::new(&stub, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();

        let doc = Document::load(dirs.output.join("a.json")).unwrap();
        assert_eq!(doc.text[0].en_text, "");
        assert_eq!(doc.text[0].en_name, "");
        assert_eq!(doc.text[0].choices[0].en_text, "");
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn test_rerun_spends_no_calls_and_keeps_manual_edits() {
        let dirs = dirs_with(&[("chapter1/scene.json", SCENE)]);
        let dictionary = Dictionary::new();

        let first = StubTranslator::new(Mode::Fixed("EN"));
        let report = Pipeline::new(&first, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();
        assert_eq!(first.call_count(), 5);
        assert_eq!(report.choices_translated, 2);

        let out_path = dirs.output.join("chapter1/scene.json");
        let mut edited = Document::load(&out_path).unwrap();
        edited.text[1].en_text = "What now?".to_string();
        edited.save(&out_path).unwrap();

        let second = StubTranslator::new(Mode::Fixed("EN"));
        let report = Pipeline::new(&second, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();
        assert_eq!(second.call_count(), 0);
        assert_eq!(report.fields_reused, 5);

        let doc = Document::load(&out_path).unwrap();
        assert_eq!(doc.text[1].en_text, "What now?");
        assert_eq!(doc.text[1].choices.len(), 2);
    }

    #[test]
    fn test_force_retranslates_everything() {
        let dirs = dirs_with(&[("scene.json", SCENE)]);
        let dictionary = Dictionary::new();

        let first = StubTranslator::new(Mode::Fixed("old"));
        Pipeline::new(&first, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();

        let second = StubTranslator::new(Mode::Fixed("new"));
        let options = PipelineOptions {
            force: true,
            ..PipelineOptions::default()
        };
        Pipeline::new(&second, &dictionary, options)
            .run(&dirs.input, &dirs.output)
            .unwrap();

        assert_eq!(second.call_count(), 5);
        let doc = Document::load(dirs.output.join("scene.json")).unwrap();
        assert_eq!(doc.text[1].choices[1].en_text, "new");
    }

    #[test]
    fn test_changed_source_is_translated_again() {
        let dirs = dirs_with(&[("scene.json", SCENE)]);
        let dictionary = Dictionary::new();

        let first = StubTranslator::new(Mode::Fixed("EN"));
        Pipeline::new(&first, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();

        fs::write(
            dirs.input.join("scene.json"),
            SCENE.replace("こんにちは", "こんばんは"),
        )
        .unwrap();

        let second = StubTranslator::new(Mode::Uppercase);
        Pipeline::new(&second, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();

        assert_eq!(second.call_count(), 1);
        assert_eq!(second.calls.borrow()[0].0, "こんばんは");
    }

    #[test]
    fn test_malformed_file_is_isolated() {
        let dirs = dirs_with(&[
            ("a.json", SCENE),
            ("b.json", "{\"text\": [ not json"),
            ("c/d.json", SCENE),
        ]);
        let stub = StubTranslator::new(Mode::Fixed("EN"));
        let dictionary = Dictionary::new();

        let report = Pipeline::new(&stub, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();

        assert_eq!(report.files_processed, 2);
        assert_eq!(report.files_failed.len(), 1);
        assert_eq!(report.files_failed[0].path, PathBuf::from("b.json"));
        assert!(matches!(
            report.files_failed[0].error,
            Error::FileParse { .. }
        ));
        assert!(dirs.output.join("a.json").exists());
        assert!(dirs.output.join("c/d.json").exists());
        assert!(!dirs.output.join("b.json").exists());
    }

    #[test]
    fn test_failed_field_stays_empty_and_is_reported() {
        let dirs = dirs_with(&[("scene.json", SCENE)]);
        let mut stub = StubTranslator::new(Mode::Fixed("EN"));
        stub.fail_on = Some("走る");
        let dictionary = Dictionary::new();

        let report = Pipeline::new(&stub, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();

        assert_eq!(report.files_processed, 1);
        assert_eq!(report.field_failures.len(), 1);
        let failure = &report.field_failures[0];
        assert_eq!(failure.location.block_idx, 5);
        assert_eq!(failure.location.field, Field::Choice(0));

        let doc = Document::load(dirs.output.join("scene.json")).unwrap();
        assert_eq!(doc.text[1].choices[0].en_text, "");
        assert_eq!(doc.text[1].choices[1].en_text, "EN");
        assert_eq!(doc.text[1].en_text, "EN");
    }

    #[test]
    fn test_context_window_feeds_texts_not_names() {
        let dirs = dirs_with(&[("scene.json", SCENE)]);
        let stub = StubTranslator::new(Mode::Fixed("EN"));
        let dictionary = Dictionary::new();
        let options = PipelineOptions {
            context_lines: 1,
            ..PipelineOptions::default()
        };

        Pipeline::new(&stub, &dictionary, options)
            .run(&dirs.input, &dirs.output)
            .unwrap();

        let calls = stub.calls.borrow();
        // name of block 1, text of block 1, text of block 5, two choices
        assert_eq!(calls[0].1, None);
        assert_eq!(calls[1].1, None);
        let ctx = calls[2].1.as_deref().unwrap();
        assert!(ctx.contains("ウマ娘: こんにちは\n[Translation]: EN: EN"));
        let choice_ctx = calls[3].1.as_deref().unwrap();
        assert!(choice_ctx.contains(": どうする？"));
        assert!(!choice_ctx.contains("こんにちは"), "window holds one block");
    }

    #[test]
    fn test_monologue_names_cleaned_and_verbatim_names() {
        let dirs = dirs_with(&[(
            "scene.json",
            r#"{"text":[
                {"blockIdx":1,"jpName":"モノローグ","jpText":"","choices":[]},
                {"blockIdx":2,"jpName":"トレーナー","jpText":"","choices":[]}
            ]}"#,
        )]);
        let stub = StubTranslator::new(Mode::Fixed("Monologue"));
        let dictionary =
            Dictionary::from_pairs([("トレーナー".to_string(), "Trainer".to_string())]);
        let options = PipelineOptions {
            dictionary_names_verbatim: true,
            ..PipelineOptions::default()
        };

        Pipeline::new(&stub, &dictionary, options)
            .run(&dirs.input, &dirs.output)
            .unwrap();

        let doc = Document::load(dirs.output.join("scene.json")).unwrap();
        assert_eq!(doc.text[0].en_name, "");
        assert_eq!(doc.text[1].en_name, "Trainer");
        assert_eq!(stub.call_count(), 1);
    }

    #[test]
    fn test_japanese_residue_is_reported() {
        let dirs = dirs_with(&[("scene.json", SCENE)]);
        let stub = StubTranslator::new(Mode::Uppercase);
        let dictionary = Dictionary::new();

        let report = Pipeline::new(&stub, &dictionary, PipelineOptions::default())
            .run(&dirs.input, &dirs.output)
            .unwrap();

        assert_eq!(report.japanese_residue.len(), 5);
        assert!(report.field_failures.is_empty());
    }

    #[test]
    fn test_missing_input_folder_is_config_error() {
        let temp = TempDir::new().unwrap();
        let stub = StubTranslator::new(Mode::Uppercase);
        let dictionary = Dictionary::new();

        let result = Pipeline::new(&stub, &dictionary, PipelineOptions::default())
            .run(&temp.path().join("missing"), &temp.path().join("out"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
