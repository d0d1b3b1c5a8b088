//! Tests for `SqliteStore` against an in-memory database.

use obt_core::{
  field::Field,
  layout::TableLayout,
  migrate,
  record::PayloadWrite,
  store::MigrationStore,
};
use rusqlite::Connection;

use crate::{Error, SqliteStore};

const TABLES: &str = "
CREATE TABLE SLIDE_RECORDS (
    UID         INTEGER PRIMARY KEY,
    SEQUENCE_NO TEXT,
    ACTUALWELL  TEXT,
    DAY         INTEGER,
    MONTH       INTEGER,
    YEAR        INTEGER
);
CREATE TABLE DAILY_REPORTS (
    ACTUALWELL TEXT,
    DAY        INTEGER,
    MONTH      INTEGER,
    YEAR       INTEGER,
    TQ_OFF     TEXT
);
";

fn connection(setup: &str) -> Connection {
  let conn = Connection::open_in_memory().unwrap();
  conn.execute_batch(TABLES).unwrap();
  conn.execute_batch(setup).unwrap();
  conn
}

fn store(setup: &str) -> SqliteStore {
  SqliteStore::from_connection(connection(setup), TableLayout::default()).expect("in-memory store")
}

fn payloads(store: &SqliteStore) -> Vec<Option<String>> {
  let mut records = store.load_records().unwrap();
  records.sort_by_key(|r| r.row_id);
  records.into_iter().map(|r| r.payload).collect()
}

fn write(row_id: i64, payload: &str) -> PayloadWrite {
  PayloadWrite { row_id, uid: Field::Integer(row_id), payload: payload.into() }
}

// ─── Layout checks ───────────────────────────────────────────────────────────

#[test]
fn missing_table_is_reported() {
  let conn = Connection::open_in_memory().unwrap();
  conn
    .execute_batch("CREATE TABLE SLIDE_RECORDS (UID, SEQUENCE_NO, ACTUALWELL, DAY, MONTH, YEAR);")
    .unwrap();

  let err = SqliteStore::from_connection(conn, TableLayout::default()).err().unwrap();
  assert!(matches!(err, Error::MissingTable(t) if t == "DAILY_REPORTS"));
}

#[test]
fn missing_column_is_reported() {
  let conn = Connection::open_in_memory().unwrap();
  conn
    .execute_batch(
      "CREATE TABLE SLIDE_RECORDS (UID, SEQUENCE_NO, ACTUALWELL, DAY, MONTH);
       CREATE TABLE DAILY_REPORTS (ACTUALWELL, DAY, MONTH, YEAR, TQ_OFF);",
    )
    .unwrap();

  let err = SqliteStore::from_connection(conn, TableLayout::default()).err().unwrap();
  assert!(matches!(err, Error::MissingColumn { column, .. } if column == "YEAR"));
}

#[test]
fn custom_layout_is_honoured() {
  let conn = Connection::open_in_memory().unwrap();
  conn
    .execute_batch(
      "CREATE TABLE \"slides v2\" (id, seq, well, d, m, y);
       CREATE TABLE reports (well, d, m, y, torque);
       INSERT INTO \"slides v2\" VALUES (1, 'S1', 'W', 1, 2, 2024);
       INSERT INTO reports VALUES ('W', 1, 2, 2024, '3.25');",
    )
    .unwrap();
  let layout = TableLayout {
    records:     "slides v2".into(),
    uid:         "id".into(),
    sequence_no: "seq".into(),
    payload:     "extra".into(),
    reports:     "reports".into(),
    tq_off:      "torque".into(),
    well:        "well".into(),
    day:         "d".into(),
    month:       "m".into(),
    year:        "y".into(),
  };
  let mut s = SqliteStore::from_connection(conn, layout).unwrap();

  let report = migrate(&mut s).unwrap();

  assert_eq!(report.updated, 1);
  assert_eq!(payloads(&s), vec![Some(r#"{"offBtmTq": 3.25, "formation": ""}"#.to_owned())]);
}

// ─── Payload column ──────────────────────────────────────────────────────────

#[test]
fn payload_column_detection() {
  let mut s = store("");
  assert!(!s.payload_column_exists().unwrap());

  s.add_payload_column(&[]).unwrap();
  assert!(s.payload_column_exists().unwrap());
}

#[test]
fn payload_column_detection_ignores_case() {
  let s = store("ALTER TABLE SLIDE_RECORDS ADD COLUMN json_fields TEXT;");
  assert!(s.payload_column_exists().unwrap());
}

#[test]
fn records_have_no_payload_before_column_exists() {
  let s = store("INSERT INTO SLIDE_RECORDS VALUES (1, '1', 'A1', 1, 6, 2024);");
  assert_eq!(payloads(&s), vec![None]);
}

#[test]
fn add_payload_column_seeds_only_given_rows() {
  let mut s = store(
    "INSERT INTO SLIDE_RECORDS VALUES (1, '1', 'A1', 1, 6, 2024);
     INSERT INTO SLIDE_RECORDS VALUES (2, '',  'A1', 1, 6, 2024);",
  );

  let seeded = s.add_payload_column(&[write(1, "{}")]).unwrap();

  assert_eq!(seeded, 1);
  assert_eq!(payloads(&s), vec![Some("{}".to_owned()), None]);
}

// ─── Overrides ───────────────────────────────────────────────────────────────

#[test]
fn blank_and_null_overrides_are_filtered_in_sql() {
  let s = store(
    "INSERT INTO DAILY_REPORTS VALUES ('A1', 1, 6, 2024, '7.5');
     INSERT INTO DAILY_REPORTS VALUES ('A2', 1, 6, 2024, '   ');
     INSERT INTO DAILY_REPORTS VALUES ('A3', 1, 6, 2024, NULL);
     INSERT INTO DAILY_REPORTS VALUES ('A4', 1, 6, 2024, '0');",
  );

  let rows = s.load_overrides().unwrap();

  assert_eq!(rows.len(), 2);
  assert!(rows.iter().any(|r| r.key.well == Field::from("A1")));
  assert!(rows.iter().any(|r| r.key.well == Field::from("A4")));
}

#[test]
fn real_and_integer_dates_join() {
  let mut s = store(
    "INSERT INTO SLIDE_RECORDS VALUES (1, '1', 'A1', 1.0, 6.0, 2024.0);
     INSERT INTO DAILY_REPORTS VALUES ('A1', 1, 6, 2024, 12.3456789);",
  );

  let report = migrate(&mut s).unwrap();

  assert_eq!(report.overridden, 1);
  assert_eq!(
    payloads(&s),
    vec![Some(r#"{"offBtmTq": 12.345679, "formation": ""}"#.to_owned())]
  );
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[test]
fn write_payloads_commits_all_rows() {
  let mut s = store(
    "INSERT INTO SLIDE_RECORDS VALUES (1, '1', 'A1', 1, 6, 2024);
     INSERT INTO SLIDE_RECORDS VALUES (2, '2', 'A1', 2, 6, 2024);
     ALTER TABLE SLIDE_RECORDS ADD COLUMN JSON_FIELDS TEXT;",
  );

  let changed = s.write_payloads(&[write(1, "a"), write(2, "b"), write(9, "gone")]).unwrap();

  assert_eq!(changed, 2);
  assert_eq!(payloads(&s), vec![Some("a".to_owned()), Some("b".to_owned())]);
}

#[test]
fn non_utf8_text_uid_is_still_written() {
  let conn = Connection::open_in_memory().unwrap();
  conn
    .execute_batch(
      "CREATE TABLE SLIDE_RECORDS (UID TEXT, SEQUENCE_NO, ACTUALWELL, DAY, MONTH, YEAR);
       CREATE TABLE DAILY_REPORTS (ACTUALWELL, DAY, MONTH, YEAR, TQ_OFF);
       INSERT INTO SLIDE_RECORDS VALUES (CAST(X'41FF' AS TEXT), '1', 'A1', 1, 6, 2024);",
    )
    .unwrap();
  let mut s = SqliteStore::from_connection(conn, TableLayout::default()).unwrap();

  let report = migrate(&mut s).unwrap();

  assert_eq!((report.seeded, report.updated), (1, 1));
  assert_eq!(payloads(&s), vec![Some(r#"{"offBtmTq": 0.0, "formation": ""}"#.to_owned())]);
}

#[test]
fn failed_write_rolls_back() {
  let mut s = store(
    "INSERT INTO SLIDE_RECORDS VALUES (1, '1', 'A1', 1, 6, 2024);
     ALTER TABLE SLIDE_RECORDS ADD COLUMN JSON_FIELDS TEXT CHECK (JSON_FIELDS <> 'bad');",
  );

  let result = s.write_payloads(&[write(1, "good"), write(1, "bad")]);

  assert!(matches!(result, Err(Error::Database(_))));
  assert_eq!(payloads(&s), vec![None]);
}

#[test]
fn end_to_end_payloads_parse_as_two_field_objects() {
  let mut s = store(
    "INSERT INTO SLIDE_RECORDS VALUES (1, '1', 'A1', 1, 6, 2024);
     INSERT INTO SLIDE_RECORDS VALUES (2, '2', 'B2', 3, 6, 2024);
     INSERT INTO SLIDE_RECORDS VALUES (3, NULL, 'B2', 3, 6, 2024);
     INSERT INTO DAILY_REPORTS VALUES ('A1', 1, 6, 2024, '7.5');",
  );

  let report = migrate(&mut s).unwrap();
  assert_eq!((report.updated, report.skipped), (2, 1));

  for payload in payloads(&s).into_iter().take(2) {
    let value: serde_json::Value = serde_json::from_str(&payload.unwrap()).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert!(object["offBtmTq"].is_number());
    assert!(object["formation"].is_string());
  }
  assert_eq!(payloads(&s)[2], None);
}
