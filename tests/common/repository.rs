use assert_fs::TempDir;
use bitlet::areas::repository::Repository;
use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use rstest::fixture;
use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

/// Writer whose contents stay readable after it was handed to a repository
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn take(&self) -> String {
        String::from_utf8(std::mem::take(&mut *self.0.borrow_mut()))
            .expect("output is valid utf-8")
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct TestRepository {
    pub dir: TempDir,
    pub repository: Repository,
    pub output: SharedOutput,
    clock: RefCell<DateTime<FixedOffset>>,
}

impl TestRepository {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, file: &str, content: &str) {
        let path = self.dir.path().join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    pub fn read(&self, file: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(file)).expect("Failed to read file")
    }

    pub fn exists(&self, file: &str) -> bool {
        self.dir.path().join(file).is_file()
    }

    /// A timestamp one minute after the previous one
    pub fn tick(&self) -> DateTime<FixedOffset> {
        let mut clock = self.clock.borrow_mut();
        *clock += Duration::minutes(1);
        *clock
    }

    /// Write, stage and commit files in one go
    pub fn commit_files(&mut self, files: &[(&str, &str)], message: &str) -> String {
        for (file, content) in files {
            self.write(file, content);
            self.repository.add(file).expect("Failed to add file");
        }
        let timestamp = self.tick();
        self.repository
            .commit_at(message, timestamp)
            .expect("Failed to commit")
            .id()
            .to_string()
    }

    /// Persist, then load the repository again from disk
    pub fn reopen(self) -> Self {
        self.repository.save().expect("Failed to save repository");
        let TestRepository {
            dir,
            repository,
            clock,
            ..
        } = self;
        drop(repository);

        let output = SharedOutput::default();
        let repository =
            Repository::open(dir.path(), Box::new(output.clone())).expect("Failed to reopen");

        TestRepository {
            dir,
            repository,
            output,
            clock,
        }
    }
}

pub fn start_clock() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .and_then(|offset| offset.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single())
        .expect("valid timestamp")
}

#[fixture]
pub fn repository() -> TestRepository {
    colored::control::set_override(false);
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = SharedOutput::default();
    let repository =
        Repository::init(dir.path(), Box::new(output.clone())).expect("Failed to init repository");
    output.take();

    TestRepository {
        dir,
        repository,
        output,
        clock: RefCell::new(start_clock()),
    }
}
