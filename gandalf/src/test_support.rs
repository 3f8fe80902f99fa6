//! Test-only engines and diff fixtures.

use std::cell::{Cell, RefCell};

use crate::error::ReviewError;
use crate::io::engine::InferenceEngine;

/// Two text files, three added lines, one removed line.
pub const TEXT_DIFF: &str = "\
diff --git a/src/db.rs b/src/db.rs
index 3b18e51..a9c2f04 100644
--- a/src/db.rs
+++ b/src/db.rs
@@ -10,3 +10,4 @@ impl Db {
     pub fn find(&self, name: &str) -> Row {
-        self.query(\"SELECT * FROM users WHERE name = ?\", name)
+        let sql = format!(\"SELECT * FROM users WHERE name = '{name}'\");
+        self.raw(&sql)
     }
diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,2 +1,3 @@
 pub mod db;
+pub mod admin;
";

/// A single binary file change.
pub const BINARY_ONLY_DIFF: &str = "\
diff --git a/assets/logo.png b/assets/logo.png
index 0f1e2d3..4c5b6a7 100644
Binary files a/assets/logo.png and b/assets/logo.png differ
";

enum Script {
    Respond(String),
    Fail(fn() -> ReviewError),
}

/// Engine that returns a fixed response and records what it was asked.
pub struct ScriptedEngine {
    script: Script,
    calls: Cell<usize>,
    last_prompt: RefCell<String>,
}

impl ScriptedEngine {
    pub fn responding(response: &str) -> Self {
        Self::new(Script::Respond(response.to_string()))
    }

    pub fn failing(make_error: fn() -> ReviewError) -> Self {
        Self::new(Script::Fail(make_error))
    }

    fn new(script: Script) -> Self {
        Self {
            script,
            calls: Cell::new(0),
            last_prompt: RefCell::new(String::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_prompt(&self) -> String {
        self.last_prompt.borrow().clone()
    }
}

impl InferenceEngine for ScriptedEngine {
    fn infer(&self, prompt: &str) -> Result<String, ReviewError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_prompt.borrow_mut() = prompt.to_string();
        match &self.script {
            Script::Respond(response) => Ok(response.clone()),
            Script::Fail(make_error) => Err(make_error()),
        }
    }
}
