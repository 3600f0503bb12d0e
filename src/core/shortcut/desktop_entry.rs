use std::path::Path;

use super::ShortcutSpec;

/// Render an XDG desktop entry launching `spec.target`.
pub fn desktop_entry(spec: &ShortcutSpec) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Version=1.0\n\
         Name={name}\n\
         Comment={comment}\n\
         Exec={exec}\n\
         Path={path}\n\
         Terminal=false\n\
         Categories=Development;\n",
        name = escape_value(&spec.name),
        comment = escape_value(&spec.description),
        exec = quote_exec_arg(&spec.target),
        path = escape_value(&spec.working_dir.to_string_lossy()),
    )
}

fn escape_value(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Exec arguments are always quoted; inside quotes `"`, `` ` ``, `$` and `\`
/// need a backslash, and the result is then escaped as a string value.
fn quote_exec_arg(path: &Path) -> String {
    let mut quoted = String::from("\"");
    for ch in path.to_string_lossy().chars() {
        if matches!(ch, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    escape_value(&quoted)
}
