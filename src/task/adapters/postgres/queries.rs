//! Parameterised statements understood by the task store.
//!
//! The statement text is the contract with the `PostgreSQL` schema; bind
//! order is documented next to each statement.

/// `$1` user id, `$2` title, `$3` description.
pub const CREATE_TASK: &str =
    "INSERT INTO tasks (user_id, title, description) VALUES ($1, $2, $3) RETURNING id";

/// `$1` task id.
pub const GET_TASK: &str = "SELECT * FROM tasks WHERE id = $1";

/// `$1` username.
pub const GET_TASKS_BY_USERNAME: &str = concat!(
    "SELECT tasks.* FROM tasks ",
    "JOIN users ON tasks.user_id = users.id ",
    "WHERE users.username = $1 ",
    "ORDER BY tasks.id",
);

/// `$1` task id, `$2` title, `$3` description, `$4` status, `$5` user id.
///
/// Empty strings and a zero user id keep the stored value.
pub const UPDATE_TASK: &str = concat!(
    "UPDATE tasks SET ",
    "title = COALESCE(NULLIF($2, ''), title), ",
    "description = COALESCE(NULLIF($3, ''), description), ",
    "status = COALESCE(NULLIF($4, ''), status), ",
    "user_id = COALESCE(NULLIF($5, 0), user_id) ",
    "WHERE id = $1 RETURNING id",
);

/// `$1` task id.
pub const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = $1 RETURNING id";

/// `$1` user id.
pub const DELETE_USER: &str = "DELETE FROM users WHERE id = $1 RETURNING id";

/// `$1` username, `$2` password.
pub const CREATE_USER: &str =
    "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id";

/// `$1` user id.
pub const CHECK_USER: &str = "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1) AS present";
