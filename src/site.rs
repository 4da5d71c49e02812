// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio pages.
//!
//! Content is static; rendering is plain string composition with every
//! interpolated value HTML-escaped.

use crate::form::FormView;
use crate::validator::ErrorKey;
use chrono::Datelike;
use std::fmt::Write;

/// A routable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    Projects,
    Contact,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::About, Page::Projects, Page::Contact];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::Projects => "/projects",
            Self::Contact => "/contact",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Projects => "Projects",
            Self::Contact => "Contact",
        }
    }

    /// Resolve a request path, ignoring a trailing slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|p| p.path() == trimmed)
    }
}

#[derive(Debug, Clone)]
pub struct Link {
    pub name: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone)]
pub struct SkillGroup {
    pub category: &'static str,
    pub items: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub github_url: &'static str,
    pub live_url: &'static str,
}

#[derive(Debug, Clone)]
pub struct ContactInfo {
    pub title: &'static str,
    pub value: &'static str,
    pub href: &'static str,
}

/// Site content.
#[derive(Debug, Clone)]
pub struct Site {
    pub owner: &'static str,
    pub headline: &'static str,
    pub tagline: &'static str,
    pub about: &'static [&'static str],
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<Project>,
    pub contact: Vec<ContactInfo>,
    pub social: Vec<Link>,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            owner: "Your Name",
            headline: "Frontend Developer & Designer",
            tagline: "I create beautiful, responsive web applications with modern technologies. \
                      Passionate about clean code, user experience, and bringing ideas to life.",
            about: &[
                "I'm a developer who enjoys turning complex problems into simple, \
                 beautiful and intuitive designs.",
                "I believe in writing clean, maintainable code and building digital \
                 experiences that users love.",
            ],
            skills: vec![
                SkillGroup {
                    category: "Frontend",
                    items: &["React", "TypeScript", "Next.js", "Tailwind CSS", "HTML5", "CSS3"],
                },
                SkillGroup {
                    category: "Backend",
                    items: &["Node.js", "Python", "PostgreSQL", "MongoDB", "REST APIs", "GraphQL"],
                },
                SkillGroup {
                    category: "Tools & Design",
                    items: &["Figma", "Git", "Docker", "VS Code", "Photoshop", "Sketch"],
                },
                SkillGroup {
                    category: "Other",
                    items: &["Problem Solving", "Team Leadership", "UI/UX Design", "Testing", "Agile", "DevOps"],
                },
            ],
            projects: vec![
                Project {
                    title: "E-commerce Platform",
                    description: "A full-stack e-commerce solution with user authentication, \
                                  product catalog, shopping cart, and payment integration.",
                    tags: &["React", "Node.js", "PostgreSQL", "Stripe"],
                    github_url: "https://github.com/yourusername/ecommerce-platform",
                    live_url: "https://your-ecommerce-site.com",
                },
                Project {
                    title: "Task Management App",
                    description: "A collaborative task manager with real-time updates, \
                                  drag-and-drop and team collaboration features.",
                    tags: &["React", "Firebase", "Tailwind CSS", "Drag & Drop"],
                    github_url: "https://github.com/yourusername/task-manager",
                    live_url: "https://your-task-app.com",
                },
                Project {
                    title: "Weather Dashboard",
                    description: "Location-based forecasts, interactive maps and historical \
                                  weather data visualization.",
                    tags: &["React", "Chart.js", "Weather API", "CSS3"],
                    github_url: "https://github.com/yourusername/weather-dashboard",
                    live_url: "https://your-weather-app.com",
                },
                Project {
                    title: "Portfolio Website",
                    description: "This site: static pages, a hardened contact form and \
                                  dark mode support.",
                    tags: &["Rust", "axum", "Tailwind CSS"],
                    github_url: "https://github.com/yourusername/portfolio",
                    live_url: "https://your-portfolio.com",
                },
            ],
            contact: vec![
                ContactInfo {
                    title: "Email",
                    value: "your.email@example.com",
                    href: "mailto:your.email@example.com",
                },
                ContactInfo {
                    title: "Phone",
                    value: "+1 (555) 123-4567",
                    href: "tel:+15551234567",
                },
                ContactInfo {
                    title: "Location",
                    value: "San Francisco, CA",
                    href: "https://maps.google.com/?q=San Francisco, CA",
                },
            ],
            social: vec![
                Link { name: "GitHub", href: "https://github.com/yourusername" },
                Link { name: "LinkedIn", href: "https://linkedin.com/in/yourusername" },
                Link { name: "Twitter", href: "https://twitter.com/yourusername" },
            ],
        }
    }
}

impl Site {
    /// Render a page. The contact page takes the form state to show.
    pub fn render(&self, page: Page, form: Option<&FormView>) -> String {
        let body = match page {
            Page::Home => self.home(),
            Page::About => self.about(),
            Page::Projects => self.projects(),
            Page::Contact => self.contact(form),
        };
        self.layout(page.title(), Some(page), &body)
    }

    pub fn render_not_found(&self) -> String {
        let body = "<section><h1>Page not found</h1>\
                    <p><a href=\"/\">Back to home</a></p></section>";
        self.layout("Not found", None, body)
    }

    fn layout(&self, title: &str, active: Option<Page>, body: &str) -> String {
        let mut nav = String::new();
        for page in Page::ALL {
            let current = if Some(page) == active { " aria-current=\"page\"" } else { "" };
            let _ = write!(nav, "<a href=\"{}\"{}>{}</a>", page.path(), current, page.title());
        }

        format!(
            "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
             <title>{title} | {owner}</title></head>\n\
             <body><header><nav>{nav}</nav></header>\n<main>{body}</main>\n\
             <footer>{social}<p>&copy; {year} {owner}. All rights reserved.</p></footer>\
             </body>\n</html>\n",
            title = escape(title),
            owner = escape(self.owner),
            nav = nav,
            body = body,
            social = self.social_links(),
            year = chrono::Utc::now().year(),
        )
    }

    fn social_links(&self) -> String {
        let mut out = String::from("<ul class=\"social\">");
        for link in &self.social {
            let _ = write!(
                out,
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></li>",
                escape(link.href),
                escape(link.name)
            );
        }
        out.push_str("</ul>");
        out
    }

    fn home(&self) -> String {
        format!(
            "<section class=\"hero\"><h1>Hi, I'm {}</h1><p>{}</p><p>{}</p>\
             <a class=\"cta\" href=\"/contact\">Contact Me</a>{}</section>",
            escape(self.owner),
            escape(self.headline),
            escape(self.tagline),
            self.social_links()
        )
    }

    fn about(&self) -> String {
        let mut out = String::from("<section><h1>About Me</h1>");
        for paragraph in self.about {
            let _ = write!(out, "<p>{}</p>", escape(paragraph));
        }
        out.push_str("<h2>Skills</h2>");
        for group in &self.skills {
            let _ = write!(out, "<div class=\"skills\"><h3>{}</h3><ul>", escape(group.category));
            for item in group.items {
                let _ = write!(out, "<li>{}</li>", escape(item));
            }
            out.push_str("</ul></div>");
        }
        out.push_str("</section>");
        out
    }

    fn projects(&self) -> String {
        let mut out = String::from("<section><h1>My Projects</h1>");
        for project in &self.projects {
            let _ = write!(
                out,
                "<article class=\"project\"><h2>{}</h2><p>{}</p><ul class=\"tags\">",
                escape(project.title),
                escape(project.description)
            );
            for tag in project.tags {
                let _ = write!(out, "<li>{}</li>", escape(tag));
            }
            let _ = write!(
                out,
                "</ul><a href=\"{}\">Code</a> <a href=\"{}\">Live Demo</a></article>",
                escape(project.github_url),
                escape(project.live_url)
            );
        }
        out.push_str("</section>");
        out
    }

    fn contact(&self, form: Option<&FormView>) -> String {
        let mut out = String::from("<section><h1>Get In Touch</h1>");

        let (name, email, message) = match form {
            Some(view) => (view.data.name.as_str(), view.data.email.as_str(), view.data.message.as_str()),
            None => ("", "", ""),
        };
        let error = |key: ErrorKey| -> String {
            form.and_then(|v| v.errors.get(key))
                .map(|msg| format!("<p class=\"error\" id=\"{key}-error\">{}</p>", escape(msg)))
                .unwrap_or_default()
        };
        let submitted = form.is_some_and(|v| v.submitted);

        if submitted {
            out.push_str("<p class=\"success\" role=\"status\">Message Sent! Thanks for reaching out.</p>");
        }
        out.push_str(&error(ErrorKey::General));

        let disabled = if submitted || form.is_some_and(|v| v.is_submitting) {
            " disabled"
        } else {
            ""
        };
        let _ = write!(
            out,
            "<form method=\"post\" action=\"/contact\">\
             <label for=\"name\">Name</label>\
             <input id=\"name\" name=\"name\" value=\"{name}\" placeholder=\"Your name\" required>{name_err}\
             <label for=\"email\">Email</label>\
             <input id=\"email\" name=\"email\" type=\"email\" value=\"{email}\" \
             placeholder=\"your.email@example.com\" required>{email_err}\
             <label for=\"message\">Message</label>\
             <textarea id=\"message\" name=\"message\" rows=\"5\" required \
             placeholder=\"Tell me about your project or just say hello!\">{message}</textarea>{message_err}\
             <div aria-hidden=\"true\" style=\"position:absolute;left:-10000px\">\
             <label for=\"website\">Website</label>\
             <input id=\"website\" name=\"honeypot\" tabindex=\"-1\" autocomplete=\"off\"></div>\
             <button type=\"submit\"{disabled}>Send Message</button></form>",
            name = escape(name),
            email = escape(email),
            message = escape(message),
            name_err = error(ErrorKey::Name),
            email_err = error(ErrorKey::Email),
            message_err = error(ErrorKey::Message),
            disabled = disabled,
        );

        out.push_str("<h2>Contact Information</h2><ul class=\"contact-info\">");
        for info in &self.contact {
            let _ = write!(
                out,
                "<li><strong>{}</strong> <a href=\"{}\">{}</a></li>",
                escape(info.title),
                escape(info.href),
                escape(info.value)
            );
        }
        out.push_str("</ul></section>");
        out
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
