//! [`SqliteStore`] — the SQLite implementation of [`MigrationStore`].

use std::path::Path;

use obt_core::{
  layout::TableLayout,
  record::{LookupKey, OverrideRow, PayloadWrite, Record},
  store::MigrationStore,
};
use rusqlite::{Connection, OpenFlags, OptionalExtension as _, Row};
use tracing::{debug, warn};

use crate::{
  Error, Result,
  encode::{decode_field, decode_payload, quote_ident},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An open database file plus the names of the tables being migrated.
pub struct SqliteStore {
  conn:   Connection,
  layout: TableLayout,
}

impl SqliteStore {
  /// Open an existing database file read-write. The file is never created.
  ///
  /// Fails if either table or any column the migration reads is missing.
  pub fn open(path: impl AsRef<Path>, layout: TableLayout) -> Result<Self> {
    let conn = Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Self::from_connection(conn, layout)
  }

  /// Wrap an already-open connection, e.g. an in-memory database in tests.
  pub fn from_connection(conn: Connection, layout: TableLayout) -> Result<Self> {
    let store = Self { conn, layout };
    store.check_layout()?;
    Ok(store)
  }

  pub fn layout(&self) -> &TableLayout { &self.layout }

  /// Close the connection, surfacing any error the implicit close on drop
  /// would swallow.
  pub fn close(self) -> Result<()> {
    self.conn.close().map_err(|(_, e)| Error::Database(e))
  }

  /// Column names of `table`, empty if the table does not exist.
  fn columns_of(&self, table: &str) -> Result<Vec<String>> {
    let mut stmt = self.conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let names = stmt
      .query_map([table], |row| row.get::<_, String>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
  }

  fn check_layout(&self) -> Result<()> {
    let l = &self.layout;
    let required = [
      (&l.records, vec![&l.uid, &l.sequence_no, &l.well, &l.day, &l.month, &l.year]),
      (&l.reports, vec![&l.well, &l.day, &l.month, &l.year, &l.tq_off]),
    ];

    for (table, columns) in required {
      let present = self.columns_of(table)?;
      if present.is_empty() {
        return Err(Error::MissingTable(table.clone()));
      }
      for column in columns {
        if !present.iter().any(|p| p.eq_ignore_ascii_case(column)) {
          return Err(Error::MissingColumn {
            table:  table.clone(),
            column: column.clone(),
          });
        }
      }
    }
    Ok(())
  }

  fn update_sql(&self) -> String {
    let l = &self.layout;
    format!(
      "UPDATE {} SET {} = ?1 WHERE rowid = ?2",
      quote_ident(&l.records),
      quote_ident(&l.payload),
    )
  }

  fn key_columns(&self) -> String {
    let l = &self.layout;
    [&l.well, &l.day, &l.month, &l.year]
      .map(|c| quote_ident(c))
      .join(", ")
  }

  /// Write each payload through `stmt` and count the rows changed, warning
  /// about writes that matched no row.
  fn execute_writes(stmt: &mut rusqlite::Statement<'_>, writes: &[PayloadWrite]) -> Result<usize> {
    let mut changed = 0;
    for w in writes {
      match stmt.execute(rusqlite::params![w.payload, w.row_id])? {
        0 => warn!(uid = %w.uid, row_id = w.row_id, "payload write matched no row"),
        n => changed += n,
      }
    }
    Ok(changed)
  }
}

/// Read the four key columns starting at `offset`.
fn read_key(row: &Row<'_>, offset: usize) -> rusqlite::Result<LookupKey> {
  Ok(LookupKey {
    well:  decode_field(row.get_ref(offset)?),
    day:   decode_field(row.get_ref(offset + 1)?),
    month: decode_field(row.get_ref(offset + 2)?),
    year:  decode_field(row.get_ref(offset + 3)?),
  })
}

// ─── MigrationStore impl ─────────────────────────────────────────────────────

impl MigrationStore for SqliteStore {
  type Error = Error;

  fn payload_column_exists(&self) -> Result<bool> {
    let found = self
      .conn
      .query_row(
        "SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2 COLLATE NOCASE",
        rusqlite::params![self.layout.records, self.layout.payload],
        |_| Ok(()),
      )
      .optional()?;
    Ok(found.is_some())
  }

  fn add_payload_column(&mut self, seed: &[PayloadWrite]) -> Result<usize> {
    let alter = format!(
      "ALTER TABLE {} ADD COLUMN {} TEXT",
      quote_ident(&self.layout.records),
      quote_ident(&self.layout.payload),
    );
    let update = self.update_sql();

    let tx = self.conn.transaction()?;
    tx.execute(&alter, [])?;
    let seeded = {
      let mut stmt = tx.prepare(&update)?;
      Self::execute_writes(&mut stmt, seed)?
    };
    tx.commit()?;

    debug!(rows = seeded, "payload column added and seeded");
    Ok(seeded)
  }

  fn load_overrides(&self) -> Result<Vec<OverrideRow>> {
    let tq_off = quote_ident(&self.layout.tq_off);
    let sql = format!(
      "SELECT {keys}, {tq_off} FROM {table} \
       WHERE {tq_off} IS NOT NULL AND TRIM({tq_off}) <> ''",
      keys = self.key_columns(),
      table = quote_ident(&self.layout.reports),
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let rows = stmt
      .query_map([], |row| {
        Ok(OverrideRow {
          key:    read_key(row, 0)?,
          tq_off: decode_field(row.get_ref(4)?),
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  fn load_records(&self) -> Result<Vec<Record>> {
    let l = &self.layout;
    let payload = if self.payload_column_exists()? {
      quote_ident(&l.payload)
    } else {
      "NULL".to_owned()
    };
    let sql = format!(
      "SELECT rowid, {uid}, {seq}, {keys}, {payload} FROM {table}",
      uid = quote_ident(&l.uid),
      seq = quote_ident(&l.sequence_no),
      keys = self.key_columns(),
      table = quote_ident(&l.records),
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let records = stmt
      .query_map([], |row| {
        Ok(Record {
          row_id:      row.get(0)?,
          uid:         decode_field(row.get_ref(1)?),
          sequence_no: decode_field(row.get_ref(2)?),
          key:         read_key(row, 3)?,
          payload:     decode_payload(row.get_ref(7)?),
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
  }

  fn write_payloads(&mut self, writes: &[PayloadWrite]) -> Result<usize> {
    let update = self.update_sql();

    let tx = self.conn.transaction()?;
    let changed = {
      let mut stmt = tx.prepare(&update)?;
      Self::execute_writes(&mut stmt, writes)?
    };
    tx.commit()?;
    Ok(changed)
  }
}
