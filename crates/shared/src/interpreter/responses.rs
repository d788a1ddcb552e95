use crate::models::{Project, Task};

pub fn operation_cancelled() -> String {
    "Operación cancelada.".to_string()
}

pub fn operation_confirmed() -> String {
    "Confirmado. Operación realizada.".to_string()
}

/// Confirmation-path listing: includes each project's status. The fresh
/// listing intent below deliberately does not.
pub fn project_list_with_status(projects: &[Project]) -> String {
    let mut reply = String::from("Estos son tus proyectos:\n");
    for project in projects {
        reply.push_str(&format!("• {} [{}]\n", project.name, project.status));
    }
    reply.trim_end().to_string()
}

pub fn project_list(projects: &[Project]) -> String {
    let mut reply = String::from("Estos son tus proyectos:\n");
    for project in projects {
        reply.push_str(&format!("• {}\n", project.name));
    }
    reply.trim_end().to_string()
}

pub fn numbered_project_options(title: &str, names: &[String]) -> String {
    let mut reply = format!("¿En qué proyecto creo \"{title}\"?\n");
    for (index, name) in names.iter().enumerate() {
        reply.push_str(&format!("{}. {}\n", index + 1, name));
    }
    reply.push_str("Responde con el número o el nombre del proyecto.");
    reply
}

pub fn project_reprompt() -> String {
    "No encontré ese proyecto. Escribe el nombre exacto del proyecto.".to_string()
}

pub fn task_created(title: &str, project_name: &str) -> String {
    format!("Tarea \"{title}\" creada en {project_name}. ¿A quién se la asigno?")
}

pub fn task_assigned(assignee: &str, title: &str) -> String {
    format!("Listo, asigné \"{title}\" a {assignee}.")
}

pub fn document_created(title: &str, project_name: &str) -> String {
    format!("Documento \"{title}\" creado en {project_name}.")
}

pub fn open_task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No hay tareas pendientes.".to_string();
    }

    let mut reply = String::from("Tareas pendientes:\n");
    for task in tasks {
        reply.push_str(&format!("• {}\n", task.title));
    }
    reply.trim_end().to_string()
}

pub fn small_talk() -> String {
    "Hola, soy el asistente del tablero. Puedo crear tareas y documentos, \
     y mostrarte tus proyectos o el backlog."
        .to_string()
}

pub fn mutation_failed(error: &str) -> String {
    format!("Ocurrió un error: {error}")
}

pub fn brain_unavailable() -> String {
    "El asistente tuvo un problema al procesar tu mensaje. Inténtalo de nuevo.".to_string()
}
