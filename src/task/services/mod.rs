//! Application services for task and user requests.

mod tasks;

pub use tasks::{
    CreateTaskRequest, CreateUserRequest, TaskService, TaskServiceError, TaskServiceResult,
    UpdateTaskRequest,
};
