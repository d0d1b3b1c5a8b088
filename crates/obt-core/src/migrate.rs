//! The migration driver: ensure the payload column, build the torque-off
//! lookup, then rewrite the payload of every qualifying record.

use tracing::{debug, error, info, warn};

use crate::{
  Error, Result,
  lookup::{LookupStats, TqLookup},
  payload::Payload,
  record::PayloadWrite,
  store::MigrationStore,
};

fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Counts gathered over one migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
  /// The payload column was missing and has been added.
  pub column_added:      bool,
  /// Rows given the default payload when the column was added.
  pub seeded:            usize,
  /// Distinct keys in the torque-off lookup.
  pub overrides_loaded:  usize,
  pub overrides_invalid: usize,
  pub overrides_zero:    usize,
  pub duplicate_keys:    usize,
  /// Qualifying records written back, as counted by the store.
  pub updated:           usize,
  /// Records that matched a lookup key.
  pub overridden:        usize,
  /// Qualifying records whose stored payload did not parse.
  pub payloads_reset:    usize,
  /// Non-qualifying records left untouched.
  pub skipped:           usize,
}

/// Outcome of [`apply_updates`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
  pub updated:        usize,
  pub overridden:     usize,
  pub payloads_reset: usize,
  pub skipped:        usize,
}

// ─── Steps ───────────────────────────────────────────────────────────────────

/// Add the payload column if it is missing and seed every qualifying record
/// with the default payload.
///
/// Returns the number of seeded records, or `None` if the column already
/// existed, in which case nothing is written.
pub fn ensure_payload_column<S: MigrationStore>(store: &mut S) -> Result<Option<usize>> {
  if store.payload_column_exists().map_err(store_err)? {
    info!("payload column already present, leaving existing values in place");
    return Ok(None);
  }

  info!("adding payload column");
  let default = Payload::default().encode()?;
  let seed: Vec<PayloadWrite> = store
    .load_records()
    .map_err(store_err)?
    .into_iter()
    .filter(|r| r.is_qualifying())
    .map(|r| PayloadWrite::for_record(&r, default.clone()))
    .collect();

  let seeded = store.add_payload_column(&seed).map_err(store_err)?;
  if seeded < seed.len() {
    warn!(expected = seed.len(), seeded, "some qualifying records were not seeded");
  }
  info!(seeded, "payload column added and initialized for qualifying records");
  Ok(Some(seeded))
}

/// Read the daily reports into a [`TqLookup`].
pub fn build_lookup<S: MigrationStore>(store: &S) -> Result<(TqLookup, LookupStats)> {
  let rows = store.load_overrides().map_err(|e| {
    error!("Error reading daily reports: {e}");
    store_err(e)
  })?;

  let (lookup, stats) = TqLookup::build(rows);
  info!("Loaded {} valid torque-off records.", lookup.len());
  Ok((lookup, stats))
}

/// Rewrite the payload of every qualifying record, applying any matching
/// torque-off value. All writes commit together.
pub fn apply_updates<S: MigrationStore>(store: &mut S, lookup: &TqLookup) -> Result<ApplyStats> {
  let records = store.load_records().map_err(|e| {
    error!("Error reading slide records: {e}");
    store_err(e)
  })?;

  let mut stats = ApplyStats::default();
  let mut writes = Vec::with_capacity(records.len());

  for record in records {
    if !record.is_qualifying() {
      stats.skipped += 1;
      continue;
    }

    let mut payload = match record.payload.as_deref() {
      None | Some("") => Payload::default(),
      Some(text) => Payload::parse(text).unwrap_or_else(|e| {
        warn!("Failed to parse payload for UID {}, using default: {e}", record.uid);
        stats.payloads_reset += 1;
        Payload::default()
      }),
    };

    if let Some(tq_off) = lookup.get(&record.key) {
      debug!(uid = %record.uid, key = %record.key, tq_off, "applying torque-off");
      payload.apply_torque(tq_off);
      stats.overridden += 1;
    }

    writes.push(PayloadWrite::for_record(&record, payload.encode()?));
  }

  stats.updated = store.write_payloads(&writes).map_err(|e| {
    error!("Error updating slide records: {e}");
    store_err(e)
  })?;
  if stats.updated < writes.len() {
    warn!(expected = writes.len(), updated = stats.updated, "some qualifying records were not written");
  }

  info!("Updated {} slide records.", stats.updated);
  info!("Skipped {} rows with an empty sequence number or no identifying data.", stats.skipped);
  Ok(stats)
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Run every step against `store`.
///
/// The store is left open; closing it is the caller's job so that it happens
/// on the error path too.
pub fn migrate<S: MigrationStore>(store: &mut S) -> Result<MigrationReport> {
  let seeded = ensure_payload_column(store)?;
  let (lookup, lookup_stats) = build_lookup(store)?;
  let applied = apply_updates(store, &lookup)?;

  Ok(MigrationReport {
    column_added:      seeded.is_some(),
    seeded:            seeded.unwrap_or(0),
    overrides_loaded:  lookup.len(),
    overrides_invalid: lookup_stats.invalid,
    overrides_zero:    lookup_stats.zero,
    duplicate_keys:    lookup_stats.duplicates,
    updated:           applied.updated,
    overridden:        applied.overridden,
    payloads_reset:    applied.payloads_reset,
    skipped:           applied.skipped,
  })
}
