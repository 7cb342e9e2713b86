use async_trait::async_trait;
use pgmigrate_config::ScriptFormat;
use pgmigrate_core::{DatabaseError, Direction, Executor, MigrationUnit};
use serde::{Deserialize, Serialize};

/// SQL for one direction: a single script or a list of statements run in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Statements {
    One(String),
    Many(Vec<String>),
}

impl Statements {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Statements::One(sql) => std::slice::from_ref(sql),
            Statements::Many(list) => list,
        }
    }
}

impl Default for Statements {
    fn default() -> Self {
        Statements::Many(Vec::new())
    }
}

/// On-disk shape of a migration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Run the statements and the ledger write in one transaction.
    #[serde(default = "default_transaction")]
    pub transaction: bool,
    pub up: Statements,
    pub down: Statements,
}

fn default_transaction() -> bool {
    true
}

impl MigrationScript {
    pub fn parse(text: &str, format: ScriptFormat) -> Result<Self, String> {
        if format.is_yaml() {
            serde_yaml::from_str(text).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(text).map_err(|e| e.to_string())
        }
    }

    pub fn statements(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Up => self.up.as_slice(),
            Direction::Down => self.down.as_slice(),
        }
    }
}

/// A statement made only of blanks and `--` comments; the template stubs are like this.
fn is_noop(sql: &str) -> bool {
    sql.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

/// Runs a parsed [`MigrationScript`].
#[derive(Debug, Clone)]
pub struct ScriptUnit {
    script: MigrationScript,
}

impl ScriptUnit {
    pub fn new(script: MigrationScript) -> Self {
        Self { script }
    }

    pub fn script(&self) -> &MigrationScript {
        &self.script
    }

    async fn run(&self, direction: Direction, db: &mut dyn Executor) -> Result<(), DatabaseError> {
        for sql in self.script.statements(direction) {
            if is_noop(sql) {
                continue;
            }
            db.execute(sql).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl MigrationUnit for ScriptUnit {
    async fn up(&self, db: &mut dyn Executor) -> Result<(), DatabaseError> {
        self.run(Direction::Up, db).await
    }

    async fn down(&self, db: &mut dyn Executor) -> Result<(), DatabaseError> {
        self.run(Direction::Down, db).await
    }

    fn transactional(&self) -> bool {
        self.script.transaction
    }
}

/// Contents of a freshly scaffolded migration file.
pub fn render_template(description: &str, format: ScriptFormat) -> Result<String, String> {
    if format.is_yaml() {
        let description = serde_yaml::to_string(description).map_err(|e| e.to_string())?;
        return Ok(format!(
            "description: {}\
             # Set to false for statements that cannot run inside a transaction.\n\
             transaction: true\n\
             up: |\n  -- SQL applied by `migrate`\n\
             down: |\n  -- SQL applied by `rollback`\n",
            description
        ));
    }
    let script = MigrationScript {
        description: Some(description.to_string()),
        transaction: true,
        up: Statements::Many(vec!["-- SQL applied by `migrate`".to_string()]),
        down: Statements::Many(vec!["-- SQL applied by `rollback`".to_string()]),
    };
    let mut text = serde_json::to_string_pretty(&script).map_err(|e| e.to_string())?;
    text.push('\n');
    Ok(text)
}
