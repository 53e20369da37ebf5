//! policy-desk: replay an editing session against the in-memory store
//!
//! ```text
//! policy-desk <scenario.json> [--config <config.json>] [--output <report.json>] [--quiet]
//! ```
//!
//! The scenario seeds the store, then drives the schedule editors,
//! endorsement batches and installment cycles it describes. The report
//! (payloads, outcomes and every editor's event log) is printed as JSON.

use group_policy_desk_core::cycle::CycleSelection;
use group_policy_desk_core::remote::{
    PolicyStatistics, StatisticsService, StoredBandRow, REMOTE_FAILURE_NOTICE,
};
use group_policy_desk_core::schedule::PartitionGap;
use group_policy_desk_core::{
    AnyScheduleEditor, AutoConfirm, CycleStatus, DeskConfig, DeskError, DeskEvent,
    EndorsementBatchEditor, EndorsementContext, EndorsementRow, InMemoryPolicyStore,
    InjectedFailure, InstallmentCycleAdvancer, RowNum, ScheduleVariant, StoreOperation,
    SubmitOutcome,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::process::ExitCode;

// ============================================================================
// Scenario file
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Scenario {
    config: DeskConfig,
    store: StoreSeed,
    schedules: Vec<ScheduleScript>,
    statistics: Vec<StatisticsScript>,
    endorsements: Vec<EndorsementScript>,
    cycles: Vec<CycleScript>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoreSeed {
    schedules: Vec<SeededSchedule>,
    statistics: Vec<SeededStatistics>,
    cycle_statuses: Vec<SeededCycleStatus>,
    failures: Vec<SeededFailure>,
}

#[derive(Debug, Deserialize)]
struct SeededSchedule {
    policy_reference: String,
    variant: ScheduleVariant,
    rows: Vec<StoredBandRow>,
}

#[derive(Debug, Deserialize)]
struct SeededStatistics {
    policy_reference: String,
    #[serde(default)]
    group_by_manager: bool,
    statistics: PolicyStatistics,
}

#[derive(Debug, Deserialize)]
struct SeededCycleStatus {
    index: u8,
    label: String,
    color: String,
    #[serde(default)]
    elapsed_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SeededFailure {
    operation: StoreOperation,
    failure: InjectedFailure,
}

#[derive(Debug, Deserialize)]
struct ScheduleScript {
    policy_reference: String,
    variant: ScheduleVariant,
    #[serde(default)]
    edits: Vec<ScheduleEdit>,
    #[serde(default)]
    save: bool,
}

/// One typed field edit; `value` is the raw text, blank clears the field
#[derive(Debug, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
enum ScheduleEdit {
    StartAge { row: u8, value: String },
    EndAge { row: u8, value: String },
    Basic { row: u8, value: String },
    Special { row: u8, value: String },
}

#[derive(Debug, Deserialize)]
struct StatisticsScript {
    policy_reference: String,
    #[serde(default)]
    group_by_manager: bool,
}

#[derive(Debug, Deserialize)]
struct EndorsementScript {
    context: EndorsementContext,
    rows: Vec<EndorsementRow>,
    #[serde(default = "confirmed")]
    confirm: bool,
}

#[derive(Debug, Deserialize)]
struct CycleScript {
    policy_row_id: i64,
    sequence_position: u32,
    index: u8,
    label: String,
    color: String,
    #[serde(default)]
    elapsed_days: Option<u32>,
    selections: Vec<CycleStep>,
}

#[derive(Debug, Deserialize)]
struct CycleStep {
    index: u8,
    #[serde(default = "confirmed")]
    confirm: bool,
}

fn confirmed() -> bool {
    true
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Serialize)]
struct Report {
    config_hash: String,
    schedules: Vec<ScheduleReport>,
    statistics: Vec<StatisticsReport>,
    endorsements: Vec<EndorsementReport>,
    cycles: Vec<CycleReport>,
}

#[derive(Debug, Serialize)]
struct ScheduleReport {
    policy_reference: String,
    variant: ScheduleVariant,
    edit_errors: Vec<String>,
    totals: Vec<String>,
    rows: Vec<StoredBandRow>,
    gaps: Vec<PartitionGap>,
    dirty: bool,
    save_message: Option<String>,
    events: Vec<DeskEvent>,
}

#[derive(Debug, Serialize)]
struct StatisticsReport {
    policy_reference: String,
    statistics: Option<PolicyStatistics>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct EndorsementReport {
    policy_number: String,
    outcome: Option<SubmitOutcome>,
    message: Option<String>,
    events: Vec<DeskEvent>,
}

#[derive(Debug, Serialize)]
struct CycleReport {
    policy_row_id: i64,
    messages: Vec<String>,
    status: CycleStatus,
    events: Vec<DeskEvent>,
}

// ============================================================================
// Replay
// ============================================================================

fn seed_store(seed: StoreSeed) -> InMemoryPolicyStore {
    let mut store = InMemoryPolicyStore::new();
    for schedule in seed.schedules {
        store.insert_schedule(&schedule.policy_reference, schedule.variant, schedule.rows);
    }
    for stats in seed.statistics {
        store.insert_statistics(&stats.policy_reference, stats.group_by_manager, stats.statistics);
    }
    for status in seed.cycle_statuses {
        store.script_cycle_status(status.index, &status.label, &status.color, status.elapsed_days);
    }
    for failure in seed.failures {
        store.fail(failure.operation, failure.failure);
    }
    store
}

fn apply_edit(editor: &mut AnyScheduleEditor, edit: &ScheduleEdit) -> Result<(), DeskError> {
    match edit {
        ScheduleEdit::StartAge { row, value } => {
            editor.set_start_age_input(RowNum::new(*row)?, value)?;
        }
        ScheduleEdit::EndAge { row, value } => {
            editor.set_end_age_input(RowNum::new(*row)?, value)?;
        }
        ScheduleEdit::Basic { row, value } => {
            editor.set_basic_input(RowNum::new(*row)?, value)?;
        }
        ScheduleEdit::Special { row, value } => {
            editor.set_special_input(RowNum::new(*row)?, value)?;
        }
    }
    Ok(())
}

fn replay_schedule(
    store: &mut InMemoryPolicyStore,
    config: &DeskConfig,
    script: &ScheduleScript,
) -> Result<ScheduleReport, DeskError> {
    let mut editor =
        AnyScheduleEditor::open(&*store, &script.policy_reference, script.variant, config)?;

    let edit_errors: Vec<String> = script
        .edits
        .iter()
        .filter_map(|edit| apply_edit(&mut editor, edit).err())
        .map(|e| e.user_message())
        .collect();

    let save_message = if script.save {
        Some(match editor.save(store) {
            Ok(outcome) => outcome.message().to_string(),
            Err(e) => e.user_message(),
        })
    } else {
        None
    };

    Ok(ScheduleReport {
        policy_reference: editor.policy_reference().to_string(),
        variant: editor.variant(),
        edit_errors,
        totals: RowNum::all().map(|row| editor.total_display(row)).collect(),
        rows: editor.upsert_rows(),
        gaps: editor.partition_gaps(),
        dirty: editor.is_dirty(),
        save_message,
        events: editor.events().events().to_vec(),
    })
}

fn replay_endorsement(
    store: &mut InMemoryPolicyStore,
    config: &DeskConfig,
    script: &EndorsementScript,
) -> Result<EndorsementReport, DeskError> {
    let mut editor =
        EndorsementBatchEditor::with_rows(script.context.clone(), script.rows.clone(), config)
            .map_err(|e| DeskError::Endorsement(vec![e]))?;

    let (outcome, message) = match editor.submit(store, &mut AutoConfirm(script.confirm)) {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => (None, Some(e.user_message())),
    };

    Ok(EndorsementReport {
        policy_number: script.context.policy_number.clone(),
        outcome,
        message,
        events: editor.events().events().to_vec(),
    })
}

fn replay_cycle(
    store: &mut InMemoryPolicyStore,
    script: &CycleScript,
) -> Result<CycleReport, DeskError> {
    let status =
        CycleStatus::from_record(script.index, &script.label, &script.color, script.elapsed_days)?;
    let mut advancer =
        InstallmentCycleAdvancer::new(script.policy_row_id, script.sequence_position, status);

    let messages = script
        .selections
        .iter()
        .map(|step| {
            match advancer.select(step.index, &mut AutoConfirm(step.confirm), &mut *store) {
                Ok(CycleSelection::Adopted(status)) => {
                    format!("index {} adopted as {}", status.index(), status.raw_label())
                }
                Ok(CycleSelection::Declined) => format!("change to {} declined", step.index),
                Ok(CycleSelection::Unchanged) => format!("index {} unchanged", step.index),
                Err(e) => e.user_message(),
            }
        })
        .collect();

    Ok(CycleReport {
        policy_row_id: script.policy_row_id,
        messages,
        status: advancer.status().clone(),
        events: advancer.events().events().to_vec(),
    })
}

fn replay(scenario: Scenario, config: DeskConfig) -> Result<Report, Box<dyn Error>> {
    let mut store = seed_store(scenario.store);

    let schedules = scenario
        .schedules
        .iter()
        .map(|script| replay_schedule(&mut store, &config, script))
        .collect::<Result<Vec<_>, _>>()?;

    let statistics = scenario
        .statistics
        .iter()
        .map(|script| {
            match store.fetch_statistics(&script.policy_reference, script.group_by_manager) {
                Ok(stats) => StatisticsReport {
                    policy_reference: script.policy_reference.clone(),
                    statistics: Some(stats),
                    error: None,
                },
                Err(_) => StatisticsReport {
                    policy_reference: script.policy_reference.clone(),
                    statistics: None,
                    error: Some(REMOTE_FAILURE_NOTICE.to_string()),
                },
            }
        })
        .collect();

    let endorsements = scenario
        .endorsements
        .iter()
        .map(|script| replay_endorsement(&mut store, &config, script))
        .collect::<Result<Vec<_>, _>>()?;

    let cycles = scenario
        .cycles
        .iter()
        .map(|script| replay_cycle(&mut store, script))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Report {
        config_hash: config.config_hash()?,
        schedules,
        statistics,
        endorsements,
        cycles,
    })
}

// ============================================================================
// Entry point
// ============================================================================

struct Args {
    scenario_path: String,
    config_path: Option<String>,
    output_path: Option<String>,
    quiet: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut scenario_path = None;
    let mut config_path = None;
    let mut output_path = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).ok_or("--config requires a path")?.clone());
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).ok_or("--output requires a path")?.clone());
            }
            "--quiet" => quiet = true,
            other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
            other => scenario_path = Some(other.to_string()),
        }
        i += 1;
    }

    Ok(Args {
        scenario_path: scenario_path.ok_or("a scenario file is required")?,
        config_path,
        output_path,
        quiet,
    })
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let scenario: Scenario = serde_json::from_str(&fs::read_to_string(&args.scenario_path)?)?;

    let config = match &args.config_path {
        Some(path) => DeskConfig::from_json(&fs::read_to_string(path)?)?,
        None => {
            scenario.config.validate()?;
            scenario.config.clone()
        }
    };

    let report = replay(scenario, config)?;
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = &args.output_path {
        fs::write(path, &json)?;
    }
    if !args.quiet {
        println!("{}", json);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("policy-desk: {}", message);
            eprintln!(
                "usage: policy-desk <scenario.json> [--config <config.json>] [--output <report.json>] [--quiet]"
            );
            return ExitCode::from(2);
        }
    };

    match run(parsed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("policy-desk: {}", e);
            ExitCode::FAILURE
        }
    }
}
