pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register),
    )
    .service(
        // `/tasks/stats` must register ahead of the `/{id}` routes so the
        // literal segment wins the match.
        web::scope("/tasks")
            .service(tasks::get_task_stats)
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
