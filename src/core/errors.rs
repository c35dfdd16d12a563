use super::Loc;

human_errors::error_shim!(RetcheckError);

/// Builds a user error describing a problem with the analyzed source code,
/// anchored at the location the problem was found.
pub fn language<D: AsRef<str>>(loc: Loc, description: D, advice: &str) -> RetcheckError {
    user(
        &format!("{} at {}.", description.as_ref(), loc),
        advice,
    )
}

impl From<std::io::Error> for RetcheckError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => user_with_internal(
                "We could not find the file you provided.",
                "Make sure that the file exists and that you have permissions to access it.",
                e,
            ),
            std::io::ErrorKind::PermissionDenied => user_with_internal(
                "You do not have permissions to access the file you provided.",
                "Make sure that you have permissions to access the file.",
                e,
            ),
            kind => system_with_internal(
                &format!("We were unable to open the file you provided due to a {} error.", kind),
                "Check the internal error message and try searching for a solution online.",
                e,
            ),
        }
    }
}
