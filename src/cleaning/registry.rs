//! Static lookup tables describing the layout of the CPET workbook.

/// Number of columns (A:W) read from every patient sheet.
pub const SHEET_WIDTH: usize = 23;

/// Minimum number of non-missing cells for a row to count as a measurement.
pub const MIN_PRESENT_CELLS: usize = 20;

/// Normalized name of the elapsed-time column.
pub const TIME_COLUMN: &str = "time_(min)";

/// Column holding the sheet identifier before renaming.
pub const PATIENT_COLUMN: &str = "patient";

/// Column holding the elapsed time in seconds.
pub const TIME_SECONDS_COLUMN: &str = "time_seconds";

/// Header applied positionally to columns A:W; the sheet's own header is ignored.
pub const SHEET_HEADER: [&str; SHEET_WIDTH] = [
    "Time (min)",
    "Work (Watts)",
    "VO2 (mL/kg/min)",
    "VO2 (mL/min)",
    "VCO2 (mL/min)",
    "RER",
    "RR (br/min)",
    "Vt BTPS (L)",
    "VE BTPS (L/min)",
    "BR (%)",
    "HR (BPM)",
    "HRR (%)",
    "PETO2 (mmHg)",
    "PETCO2 (mmHg)",
    "RR (br/min) copy",
    "VO2/Pred (%)",
    "Ti/Ttot",
    "Ti (sec)",
    "Te (sec)",
    "Ttot (sec)",
    "msec",
    "msec_diff_quad",
    "RMSSQ",
];

// SM is left out until its header layout has been checked.
const SKIP_ROWS: &[(&str, u32)] = &[
    ("FG", 3),
    ("VR", 4),
    ("CN", 4),
    ("SG", 3),
    ("AA", 4),
    ("MS", 4),
    ("GE", 4),
    ("PT", 4),
    ("CM", 3),
    ("CN2", 4),
    ("CG", 3),
    ("MP", 3),
    ("IL", 4),
    ("GR", 4),
    ("VG", 4),
    ("GP", 4),
    ("CL", 4),
    ("GM", 4),
    ("SL", 4),
];

const RENAMES: &[(&str, &str)] = &[
    ("work_(watts)", "work_watts"),
    ("vo2_(ml/kg/min)", "vo2_ml_per_kg_min"),
    ("vo2_(ml/min)", "vo2_ml_per_min"),
    ("vco2_(ml/min)", "vco2_ml_per_min"),
    ("rer", "rer"),
    ("rr_(br/min)", "rr_br_per_min"),
    ("vt_btps_(l)", "vt_btps_l"),
    ("ve_btps_(l/min)", "ve_btps_l_per_min"),
    ("br_(%)", "breathing_reserve_pct"),
    ("hr_(bpm)", "hr_bpm"),
    ("hrr_(%)", "hrr_pct"),
    ("peto2_(mmhg)", "peto2_mmhg"),
    ("petco2_(mmhg)", "petco2_mmhg"),
    // These two keys never match a normalized header, so the columns keep
    // their normalized names in the output.
    ("rr_(br/min)copy", "rr_br_per_min_copy"),
    ("vo2/pred(%)", "vo2_pred_pct"),
    ("ti/ttot", "ti_ttot_ratio"),
    ("ti_(sec)", "ti_sec"),
    ("te_(sec)", "te_sec"),
    ("ttot_(sec)", "ttot_sec"),
    ("msec", "rr_interval_msec"),
    ("msec_diff_quad", "rr_interval_diff_squared_msec"),
    ("rmssq", "rmssd_ms"),
    ("patient", "patient_id"),
    ("time_seconds", "time_seconds"),
];

/// Returns the number of leading rows to discard for `sheet`, or `None` when
/// the sheet is not registered and must be skipped.
pub fn skip_rows_for(sheet: &str) -> Option<u32> {
    SKIP_ROWS
        .iter()
        .find(|(name, _)| *name == sheet)
        .map(|(_, rows)| *rows)
}

/// Returns the canonical name for a normalized column name, if one is registered.
pub fn canonical_name(normalized: &str) -> Option<&'static str> {
    RENAMES
        .iter()
        .find(|(raw, _)| *raw == normalized)
        .map(|(_, canonical)| *canonical)
}
