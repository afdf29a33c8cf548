use engine::api::{roll_expression, roll_stats, RollRequest, SheetSummary, StatsRequest};
use engine::CharacterSheet;
use jni::objects::{JClass, JString};
use jni::sys::{jlong, jstring};
use jni::JNIEnv;
use serde::Serialize;
use serde_json::json;

const VERSION: &str = "charsheet-ffi 0.1.0";

fn ok_payload(value: impl Serialize) -> String {
    match serde_json::to_value(value) {
        Ok(v) => json!({ "ok": true, "result": v }).to_string(),
        Err(e) => err_payload(e),
    }
}

fn err_payload(e: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

fn to_jstring(env: &JNIEnv, payload: String) -> jstring {
    match env.new_string(payload) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn read_input(env: &mut JNIEnv, input: &JString) -> Result<String, String> {
    env.get_string(input)
        .map(|s| s.into())
        .map_err(|e| e.to_string())
}

/// `{"expression": "...", "mode": "advantage", "seed": 1}` → roll envelope.
pub fn evaluate_json(input: &str) -> String {
    let req: RollRequest = match serde_json::from_str(input) {
        Ok(r) => r,
        Err(e) => return err_payload(format!("invalid_request: {}", e)),
    };
    match roll_expression(&req) {
        Ok(res) => ok_payload(res),
        Err(e) => err_payload(format!("{:#}", e)),
    }
}

/// Negative seeds mean "use fresh entropy".
pub fn roll_stats_json(seed: i64) -> String {
    let seed = u64::try_from(seed).ok();
    ok_payload(roll_stats(&StatsRequest { seed }))
}

pub fn sheet_summary_json(input: &str) -> String {
    match serde_json::from_str::<CharacterSheet>(input) {
        Ok(sheet) => ok_payload(SheetSummary::from(&sheet)),
        Err(e) => err_payload(format!("invalid_sheet: {}", e)),
    }
}

#[no_mangle]
pub extern "system" fn Java_com_charsheet_Ffi_version<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    to_jstring(&env, VERSION.to_string())
}

#[no_mangle]
pub extern "system" fn Java_com_charsheet_Ffi_evaluateJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let payload = match read_input(&mut env, &json) {
        Ok(input) => evaluate_json(&input),
        Err(e) => err_payload(e),
    };
    to_jstring(&env, payload)
}

#[no_mangle]
pub extern "system" fn Java_com_charsheet_Ffi_rollStatsJson(
    env: JNIEnv,
    _class: JClass,
    seed: jlong,
) -> jstring {
    to_jstring(&env, roll_stats_json(seed))
}

#[no_mangle]
pub extern "system" fn Java_com_charsheet_Ffi_sheetSummaryJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let payload = match read_input(&mut env, &json) {
        Ok(input) => sheet_summary_json(&input),
        Err(e) => err_payload(e),
    };
    to_jstring(&env, payload)
}
