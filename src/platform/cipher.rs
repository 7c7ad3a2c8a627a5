//! Signature and n-parameter deciphering for the video platform player
//!
//! The player script carries the transforms as obfuscated JavaScript. The
//! relevant functions are cut out with regular expressions and evaluated in a
//! fresh `deno_core` runtime; nothing here re-implements the transforms.

use crate::error::ShimError;
use deno_core::{v8, FastString, JsRuntime, RuntimeOptions};
use regex::Regex;
use tracing::debug;

/// Name the extracted n-function is bound to before evaluation
pub const NSIG_FUNCTION_NAME: &str = "decrypt_nsig";

/// Placeholder for the player-global variable name in signature patterns
const GLOBAL_VAR_PLACEHOLDER: &str = "GLOBAL_VAR_NAME";

/// Call sites that hand the `n` parameter to the n-function
const NSIG_CALL_PATTERNS: &[&str] = &[
    r#"null\)&&\([a-zA-Z]=(?P<nfunc>[_a-zA-Z0-9$]+)\[(?P<idx>\d+)\]\([a-zA-Z0-9]\)"#,
    r#"&&\(b="n+"\[[a-zA-Z0-9.+$]+\],c=a\.get\(b\)\)&&\(c=(?P<nfunc>[a-zA-Z0-9$]+)(?:\[(?P<idx>\d+)\])?\([a-zA-Z0-9]\)"#,
    r#"\.get\("n"\)\)&&\(b=(?P<nfunc>[a-zA-Z0-9$]+)(?:\[(?P<idx>\d+)\])?\([a-zA-Z0-9]\)"#,
];

/// Known shapes of the end of the n-function, appended to its name
const NSIG_FUNCTION_ENDINGS: &[&str] = &[
    r#"=\s*function([\S\s]*?\}\s*return [A-Za-z0-9$]+\[[A-Za-z0-9$]+\[\d+\]\]\([A-Za-z0-9$]+\[\d+\]\)\s*\};)"#,
    r#"=\s*function(\(\w\)\s*\{[\S\s]*\{return.[a-zA-Z0-9_-]+_w8_.+?\}\s*return\s*\w+.join\(""\)\};)"#,
    r#"=\s*function([\S\s]*?\}\s*return \w+?\.join\([^)]+\)\s*\};)"#,
    r#"=\s*function([\S\s]*?\}\s*return [\W\w$]+?\.call\([\w$]+?,""\)\s*\};)"#,
];

/// Signature function shapes, oldest first
const SIGNATURE_FUNCTION_PATTERNS: &[&str] = &[
    r#"\s*?([a-zA-Z0-9_$]{1,})=function\([a-zA-Z]{1}\)\{(.{1}=.{1}\.split\([a-zA-Z0-9\-_$\[\]"]+\)[^}{]+)return .{1}\.join\([a-zA-Z0-9\-_$\[\]"]+\)\}"#,
    r#"([a-zA-Z0-9_$]{1,})=function\(([a-zA-Z0-9_$]{1})\)\{[^&}]*GLOBAL_VAR_NAME\[[^\]]+\][^}]*return [^}]*GLOBAL_VAR_NAME\[[^\]]+\][^}]*\}"#,
    r#"([a-zA-Z0-9_$]{1,})=function\(([a-zA-Z0-9_$]{1})\)\{[^}]*return [^}]*GLOBAL_VAR_NAME\[[^\]]+\][^}]*\}"#,
];

const GLOBAL_VAR_PATTERN: &str = r#"['"]use\s+strict['"];\s*(var\s+([a-zA-Z0-9_$]+)\s*=\s*(?:"[^"]*"\.split\("[^"]*"\)|'[^']*'\.split\('[^']*'\)|\[[^\]]*\]))[;,]"#;
const HELPER_OBJECT_NAME_PATTERN: &str = r#";([A-Za-z0-9_$]{2,})(?:\.|\[)"#;
const SIGNATURE_TIMESTAMP_PATTERN: &str = r#"signatureTimestamp[=:](\d+)"#;

/// Player-global string table declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalVar {
    /// Variable name
    pub name: String,
    /// Full `var NAME=...` declaration
    pub code: String,
}

/// Standalone JavaScript for the signature function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCode {
    /// Name to call the function by
    pub function_name: String,
    /// Declarations needed to evaluate it
    pub code: String,
}

/// Signature cipher bound to one player script
pub struct Cipher<'a> {
    player_js: &'a str,
    global_var: Option<GlobalVar>,
}

impl<'a> Cipher<'a> {
    /// Analyze a player script
    pub fn new(player_js: &'a str) -> Result<Self, ShimError> {
        let global_var = extract_global_var(player_js)?;
        if let Some(global_var) = &global_var {
            debug!("Found player global variable: {}", global_var.name);
        }

        Ok(Self {
            player_js,
            global_var,
        })
    }

    /// Player-global variable, if the player declares one
    pub fn global_var(&self) -> Option<&GlobalVar> {
        self.global_var.as_ref()
    }

    /// Decipher the n-parameter (throttling token)
    pub fn decipher_n_parameter(&self, n_param: &str) -> Result<String, ShimError> {
        debug!("Deciphering n-parameter: {}", n_param);

        let code = self.nsig_code()?;
        let result = run_js_function(&code, NSIG_FUNCTION_NAME, n_param)?;
        check_nsig_result(n_param, result)
    }

    /// Decipher the `s` signature
    pub fn decipher_signature(&self, signature: &str) -> Result<String, ShimError> {
        debug!("Deciphering signature: {}", signature);

        let signature_code = self.signature_code()?;
        run_js_function(
            &signature_code.code,
            &signature_code.function_name,
            signature,
        )
    }

    /// Signature timestamp the player was built with
    pub fn signature_timestamp(&self) -> Result<String, ShimError> {
        Regex::new(SIGNATURE_TIMESTAMP_PATTERN)?
            .captures(self.player_js)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                ShimError::Extraction("signatureTimestamp not found in player".to_string())
            })
    }

    /// Name of the n-function, resolving array indirection
    pub fn nsig_function_name(&self) -> Result<String, ShimError> {
        for pattern in NSIG_CALL_PATTERNS {
            let Some(captures) = Regex::new(pattern)?.captures(self.player_js) else {
                continue;
            };
            let Some(name) = captures.name("nfunc") else {
                continue;
            };

            let name = name.as_str();
            let Some(idx) = captures.name("idx") else {
                debug!("Found n-function: {}", name);
                return Ok(name.to_string());
            };

            let idx: usize = idx
                .as_str()
                .parse()
                .map_err(|e| ShimError::Extraction(format!("bad n-function index: {}", e)))?;
            let array_regex = Regex::new(&format!(
                r#"var {}\s*=\s*\[(.+?)\][;,]"#,
                regex::escape(name)
            ))?;
            let array = array_regex
                .captures(self.player_js)
                .and_then(|captures| captures.get(1))
                .ok_or_else(|| {
                    ShimError::Extraction(format!("n-function array {} not found", name))
                })?;

            let resolved = array
                .as_str()
                .split(',')
                .nth(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ShimError::Extraction(format!("index {} out of range in array {}", idx, name))
                })?;

            debug!("Found n-function: {}[{}] -> {}", name, idx, resolved);
            return Ok(resolved.to_string());
        }

        Err(ShimError::Extraction(
            "n-function name not found in player".to_string(),
        ))
    }

    /// JavaScript defining `decrypt_nsig` and everything it needs
    pub fn nsig_code(&self) -> Result<String, ShimError> {
        let function_name = self.nsig_function_name()?;

        for ending in NSIG_FUNCTION_ENDINGS {
            let function_regex = Regex::new(&format!(
                r#"(?:^|[^a-zA-Z0-9_$]){}{}"#,
                regex::escape(&function_name),
                ending
            ))?;
            let Some(body) = function_regex
                .captures(self.player_js)
                .and_then(|captures| captures.get(1))
            else {
                continue;
            };

            let function_code = format!("function {}{}", NSIG_FUNCTION_NAME, body.as_str());
            let function_code = fixup_nsig_code(&function_code, self.global_var.as_ref())?;
            debug!("Extracted n-function code ({} chars)", function_code.len());
            return Ok(self.with_global_var(&function_code));
        }

        Err(ShimError::Extraction(format!(
            "body of n-function {} not found",
            function_name
        )))
    }

    /// Name of the signature function
    pub fn signature_function_name(&self) -> Result<String, ShimError> {
        for pattern in SIGNATURE_FUNCTION_PATTERNS {
            let pattern = if pattern.contains(GLOBAL_VAR_PLACEHOLDER) {
                match &self.global_var {
                    Some(global_var) => {
                        pattern.replace(GLOBAL_VAR_PLACEHOLDER, &regex::escape(&global_var.name))
                    }
                    None => continue,
                }
            } else {
                pattern.to_string()
            };

            if let Some(name) = Regex::new(&pattern)?
                .captures(self.player_js)
                .and_then(|captures| captures.get(1))
            {
                debug!("Found signature function: {}", name.as_str());
                return Ok(name.as_str().to_string());
            }
        }

        Err(ShimError::Extraction(
            "signature function not found in player".to_string(),
        ))
    }

    /// Signature function plus its helper object
    pub fn signature_code(&self) -> Result<SignatureCode, ShimError> {
        let function_name = self.signature_function_name()?;

        let body_regex = Regex::new(&format!(
            r#"(?:^|[^a-zA-Z0-9_$])({}=function\([a-zA-Z0-9_$]+\)\{{.+?\}})"#,
            regex::escape(&function_name)
        ))?;
        let body = body_regex
            .captures(self.player_js)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                ShimError::Extraction(format!("body of signature function {} not found", function_name))
            })?;

        let global_name = self.global_var.as_ref().map(|g| g.name.as_str());
        let helper_name = Regex::new(HELPER_OBJECT_NAME_PATTERN)?
            .captures_iter(body)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str())
            .find(|name| Some(*name) != global_name)
            .ok_or_else(|| {
                ShimError::Extraction("signature helper object name not found".to_string())
            })?;

        let helper_regex = Regex::new(&format!(
            r#"var {}=\{{(?:.|\n)+?\}}\}};"#,
            regex::escape(helper_name)
        ))?;
        let helper = helper_regex
            .find(self.player_js)
            .map(|m| m.as_str())
            .ok_or_else(|| {
                ShimError::Extraction(format!("signature helper object {} not found", helper_name))
            })?;

        debug!(
            "Extracted signature function {} with helper {}",
            function_name, helper_name
        );

        let code = format!("var {};{}{};", function_name, helper, body);
        Ok(SignatureCode {
            code: self.with_global_var(&code),
            function_name,
        })
    }

    fn with_global_var(&self, code: &str) -> String {
        match &self.global_var {
            Some(global_var) => format!("{};\n{}", global_var.code, code),
            None => code.to_string(),
        }
    }
}

/// Find the player-global string table declared after `'use strict';`
pub fn extract_global_var(player_js: &str) -> Result<Option<GlobalVar>, ShimError> {
    let global_var = Regex::new(GLOBAL_VAR_PATTERN)?
        .captures(player_js)
        .and_then(|captures| match (captures.get(1), captures.get(2)) {
            (Some(code), Some(name)) => Some(GlobalVar {
                name: name.as_str().to_string(),
                code: code.as_str().to_string(),
            }),
            _ => None,
        });

    Ok(global_var)
}

/// Strip `typeof` early-return guards that break standalone evaluation
pub fn fixup_nsig_code(code: &str, global_var: Option<&GlobalVar>) -> Result<String, ShimError> {
    let Some(arg_name) = Regex::new(r#"^function\s*[a-zA-Z0-9_$]*\s*\(\s*([a-zA-Z0-9_$]+)"#)?
        .captures(code)
        .and_then(|captures| captures.get(1))
    else {
        return Ok(code.to_string());
    };

    let global_check = global_var
        .map(|g| format!(r#"|{}\[\d+\]"#, regex::escape(&g.name)))
        .unwrap_or_default();
    let guard_regex = Regex::new(&format!(
        r#";\s*if\s*\(\s*typeof\s+[a-zA-Z0-9_$]+\s*===?\s*(?:"undefined"|'undefined'{})\s*\)\s*return\s+{}\s*;"#,
        global_check,
        regex::escape(arg_name.as_str())
    ))?;

    Ok(guard_regex.replace_all(code, ";").into_owned())
}

/// Reject the values the n-function returns when it bails out
pub fn check_nsig_result(input: &str, result: String) -> Result<String, ShimError> {
    if result.starts_with("enhanced_except_") || result.ends_with(&format!("_w8_{}", input)) {
        return Err(ShimError::Script(
            "n-function returned an exception marker".to_string(),
        ));
    }
    Ok(result)
}

/// Evaluate `code`, then call `function_name(arg)` and return the string result
fn run_js_function(code: &str, function_name: &str, arg: &str) -> Result<String, ShimError> {
    let mut runtime = JsRuntime::new(RuntimeOptions::default());

    runtime
        .execute_script("<player>", FastString::from(code.to_string()))
        .map_err(|e| ShimError::Script(format!("player code evaluation failed: {}", e)))?;

    let call_code = format!("{}({})", function_name, serde_json::to_string(arg)?);
    let result = runtime
        .execute_script("<call>", FastString::from(call_code))
        .map_err(|e| ShimError::Script(format!("call to {} failed: {}", function_name, e)))?;

    let scope = &mut runtime.handle_scope();
    let value = v8::Local::new(scope, result);
    if !value.is_string() {
        return Err(ShimError::Script(format!(
            "{} returned a non-string value",
            function_name
        )));
    }

    Ok(value.to_rust_string_lossy(scope))
}
