use crate::scanner::ProjectAnalysis;

/// Renders the Markdown report for `analysis`, listing at most `route_limit` routes.
pub fn render(analysis: &ProjectAnalysis, route_limit: usize) -> String {
    let mut out = format!("# {} Project Analysis\n\n", analysis.project_name);
    out.push_str("## Project Overview\n\n");

    push_list(&mut out, "Frameworks/Libraries Detected", analysis.frameworks.iter());
    push_list(&mut out, "Programming Languages", analysis.languages.iter());
    push_list(&mut out, "Application Entry Points", analysis.entry_points.iter());
    push_list(&mut out, "Important Configuration Files", analysis.important_files.iter());
    push_routes(&mut out, &analysis.api_routes, route_limit);
    push_list(&mut out, "Database Configuration", analysis.database_info.iter());
    push_list(&mut out, "Multilingual Features", analysis.multilingual_features.iter());

    out.push_str("## File Structure\n\n```\n");
    out.push_str(&analysis.file_tree);
    out.push_str("```\n\n");

    push_run_instructions(&mut out, analysis);
    push_notes(&mut out, analysis);
    out
}

fn push_list<'a, I>(out: &mut String, title: &str, items: I)
where
    I: ExactSizeIterator<Item = &'a String>,
{
    if items.len() == 0 {
        return;
    }

    out.push_str(&format!("### {}\n\n", title));
    for item in items {
        out.push_str(&format!("- {}\n", item));
    }
    out.push('\n');
}

fn push_routes(out: &mut String, routes: &[String], route_limit: usize) {
    if routes.is_empty() {
        return;
    }

    out.push_str("### API Routes\n\n");
    for route in routes.iter().take(route_limit) {
        out.push_str(&format!("- {}\n", route));
    }
    if routes.len() > route_limit {
        out.push_str(&format!(
            "- ... and {} more routes\n",
            routes.len() - route_limit
        ));
    }
    out.push('\n');
}

fn push_command_step(out: &mut String, step: &str, commands: &[&str]) {
    out.push_str(step);
    out.push_str("\n   ```\n");
    for command in commands {
        out.push_str(&format!("   {}\n", command));
    }
    out.push_str("   ```\n\n");
}

fn push_run_instructions(out: &mut String, analysis: &ProjectAnalysis) {
    out.push_str("## How to Run the Application\n\n");

    if analysis.is_node_project() {
        out.push_str("### For Node.js Applications\n\n");
        push_command_step(out, "1. Install dependencies:", &["npm install"]);
        push_command_step(out, "2. Start the application:", &["npm start"]);
    }

    if analysis.has_language("Python") {
        out.push_str("### For Python Applications\n\n");
        push_command_step(
            out,
            "1. Set up a virtual environment (optional but recommended):",
            &[
                "python -m venv venv",
                "source venv/bin/activate  # On Windows: venv\\Scripts\\activate",
            ],
        );
        push_command_step(
            out,
            "2. Install dependencies:",
            &["pip install -r requirements.txt"],
        );

        if analysis.has_framework("Flask") {
            push_command_step(
                out,
                "3. Run Flask application:",
                &["flask run --host=0.0.0.0 --port=8000"],
            );
        } else if analysis.has_framework("Django") {
            push_command_step(
                out,
                "3. Run Django application:",
                &["python manage.py runserver 0.0.0.0:8000"],
            );
        } else {
            push_command_step(
                out,
                "3. Run the main Python file (example):",
                &["python app.py"],
            );
        }
    }
}

fn push_notes(out: &mut String, analysis: &ProjectAnalysis) {
    out.push_str("## Notes for Future Modifications\n\n");
    out.push_str("When modifying this application, pay attention to the following:\n\n");

    if !analysis.multilingual_features.is_empty() {
        out.push_str(
            "- The application has multilingual features, so ensure translations are maintained.\n",
        );
    }

    if analysis.has_framework("React") {
        out.push_str(
            "- This is a React application - be careful with component state and props.\n",
        );
    } else if analysis.has_framework("Vue.js") {
        out.push_str(
            "- This is a Vue.js application - be careful with component structure and reactivity.\n",
        );
    } else if analysis.has_framework("Angular") {
        out.push_str("- This is an Angular application - be careful with module structure and dependency injection.\n");
    }

    if !analysis.api_routes.is_empty() {
        out.push_str(
            "- The application has API routes - ensure these remain functional when making changes.\n",
        );
    }

    if !analysis.database_info.is_empty() {
        out.push_str("- The application uses a database - be careful with schema changes.\n");
    }

    out.push_str(
        "- Always test thoroughly after making changes to ensure functionality is preserved.\n",
    );
}
