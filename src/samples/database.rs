//! Shows how a database dependent test class could be implemented.
//!
//! The connection is made once per class instance and reused by every test.
//! Each test runs inside a transaction that is always rolled back afterwards,
//! so tests never change the database content.

use rudiment::{Context, Outcome, TestCase, TestMethod};

use std::io::Write;

#[derive(Default)]
pub struct DatabaseTest {
    connection: Option<DummyConnection>,
}

/// Stands in for a real database connection.
struct DummyConnection;

impl DummyConnection {
    fn connect(out: &mut dyn Write) -> std::io::Result<Self> {
        writeln!(out, "Would now: Connect to database")?;
        Ok(DummyConnection)
    }

    fn begin_transaction(&mut self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Would now: Begin a transaction")
    }

    fn roll_back_transaction(&mut self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Would now: Roll back a transaction")
    }

    fn simulate_some_data_retrieval(&self) -> &'static str {
        "Database said: stuff"
    }
}

impl DatabaseTest {
    fn retrieval_test(&mut self, t: &mut Context) -> Outcome {
        match self.connection {
            Some(ref connection) => {
                let data = connection.simulate_some_data_retrieval();
                t.assert_equals("Database said: stuff", data, "");
            },
            None => t.fail("set_up did not connect"),
        }

        Ok(())
    }
}

impl TestCase for DatabaseTest {
    fn methods() -> Vec<TestMethod<Self>> {
        vec![method!(retrieval_test)]
    }

    fn set_up(&mut self, t: &mut Context) -> Outcome {
        if self.connection.is_none() {
            self.connection = Some(DummyConnection::connect(t.out())?);
        }

        if let Some(ref mut connection) = self.connection {
            connection.begin_transaction(t.out())?;
        }
        Ok(())
    }

    fn tear_down(&mut self, t: &mut Context) -> Outcome {
        if let Some(ref mut connection) = self.connection {
            connection.roll_back_transaction(t.out())?;
        }
        Ok(())
    }
}

register!(DatabaseTest);
