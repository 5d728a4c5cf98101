// File: src/c_api.rs
//! C ABI. Every call returns plain data; strings handed out must be
//! released with [`hangul_align_free_string`].
use crate::core::engine::Aligner;
use crate::core::tables::CostTables;
use crate::persistence::load_or_compile;
use libc::c_char;
use serde_json::json;
use std::ffi::{CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::ptr;
use std::sync::{Arc, OnceLock};
use tracing::error;

static TABLES: OnceLock<Arc<CostTables>> = OnceLock::new();

/// Loaded once; alignments only ever read them.
fn tables() -> Arc<CostTables> {
    Arc::clone(TABLES.get_or_init(|| Arc::new(CostTables::uniform())))
}

unsafe fn str_arg<'a>(arg: *const c_char) -> Option<&'a str> {
    if arg.is_null() {
        return None;
    }
    CStr::from_ptr(arg).to_str().ok()
}

fn into_c_string(json: String) -> *mut c_char {
    match CString::new(json) {
        Ok(s) => s.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Loads cost tables from a JSON table document, or the built-in uniform
/// tables when `tables_path` is null.
///
/// Returns 0 on success, 1 if tables were already loaded (the call has no
/// effect), -1 if the path is not UTF-8 or the document could not be
/// loaded, -2 on panic.
///
/// # Safety
/// `tables_path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hangul_align_init(tables_path: *const c_char) -> i32 {
    let path = str_arg(tables_path).map(Path::new);
    if path.is_none() && !tables_path.is_null() {
        error!("table path is not valid UTF-8");
        return -1;
    }
    let result = catch_unwind(AssertUnwindSafe(|| {
        if TABLES.get().is_some() {
            return 1;
        }
        match load_or_compile(path, None) {
            Ok(tables) => match TABLES.set(Arc::new(tables)) {
                Ok(()) => 0,
                Err(_) => 1,
            },
            Err(e) => {
                error!(error = %e, "failed to load cost tables");
                -1
            }
        }
    }));
    result.unwrap_or(-2)
}

/// Aligns two texts and returns the alignment summary as JSON, or
/// `{"error": "..."}`. Returns null only if the JSON itself cannot be
/// handed over.
///
/// # Safety
/// `reference` and `raw` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn hangul_align_json(
    reference: *const c_char,
    raw: *const c_char,
    multi_unit: bool,
) -> *mut c_char {
    let (Some(reference), Some(raw)) = (str_arg(reference), str_arg(raw)) else {
        return into_c_string(json!({ "error": "arguments must be non-null UTF-8 strings" }).to_string());
    };
    let result = catch_unwind(AssertUnwindSafe(|| {
        let aligner = Aligner::new(tables()).with_multi_unit(multi_unit);
        match aligner.align(reference, raw) {
            Ok(alignment) => serde_json::to_string(&alignment.summary())
                .unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string()),
            Err(e) => json!({ "error": e.to_string() }).to_string(),
        }
    }));
    let json = result.unwrap_or_else(|_| {
        error!("panic while aligning");
        json!({ "error": "internal error" }).to_string()
    });
    into_c_string(json)
}

/// # Safety
/// `s` must be null or a pointer returned by this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn hangul_align_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(reference: &str, raw: &str) -> serde_json::Value {
        let reference = CString::new(reference).unwrap();
        let raw = CString::new(raw).unwrap();
        unsafe {
            let out = hangul_align_json(reference.as_ptr(), raw.as_ptr(), true);
            assert!(!out.is_null());
            let value = serde_json::from_str(CStr::from_ptr(out).to_str().unwrap()).unwrap();
            hangul_align_free_string(out);
            value
        }
    }

    #[test]
    fn aligns_through_the_c_boundary() {
        let value = call("가", "가아아");
        assert_eq!(value["total_cost"], 0.0);
        assert_eq!(value["syllable_mapping"]["0"], json!([0, 1, 2]));
    }

    #[test]
    fn errors_come_back_as_json() {
        let value = call("", "가");
        assert!(value["error"].as_str().unwrap().contains("no Hangul"));

        let out = unsafe { hangul_align_json(ptr::null(), ptr::null(), true) };
        let text = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
        unsafe { hangul_align_free_string(out) };
        assert!(text.contains("error"));
    }

    #[test]
    fn non_utf8_table_path_is_rejected() {
        let path = CString::new(vec![0xFFu8, 0xFE]).unwrap();
        assert_eq!(unsafe { hangul_align_init(path.as_ptr()) }, -1);
    }

    #[test]
    fn second_init_is_a_no_op() {
        unsafe {
            let first = hangul_align_init(ptr::null());
            assert!(first == 0 || first == 1);
            assert_eq!(hangul_align_init(ptr::null()), 1);
        }
    }
}
