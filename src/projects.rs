// Case-study records shown in the project modal, keyed by `data-project-id`.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectRecord {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub tech: &'static [&'static str],
    pub link: &'static str,
}

pub const PROJECTS: &[(&str, ProjectRecord)] = &[
    (
        "project1",
        ProjectRecord {
            title: "Secure Web Portal",
            subtitle: "CyberSecurity Awareness",
            description: "Developed a comprehensive, role-based web portal for a \
                cybersecurity awareness program. The platform provides distinct dashboards and \
                functionalities for students, teachers, and administrators to manage courses, \
                track progress, and simulate real-world security scenarios. A key feature is \
                the integration of a CVE (Common Vulnerabilities and Exposures) tracking \
                system to keep users updated on the latest threats, alongside a virtual lab \
                environment using VMs for hands-on practice with OWASP Top 10 vulnerabilities.",
            tech: &[
                "Java",
                "Spring Boot",
                "Spring Security",
                "JavaScript",
                "MySQL",
                "VirtualBox",
                "OWASP",
            ],
            link: "https://github.com/K4LYAN",
        },
    ),
    (
        "project2",
        ProjectRecord {
            title: "Modern Career",
            subtitle: "Guidance Platform",
            description: "Engineered an intelligent career guidance platform \
                designed to replace traditional counseling methods. The system uses a multi- \
                faceted recommendation engine, leveraging collaborative filtering and content- \
                based filtering (NLP) to analyze user profiles, academic performance, and \
                interests. It provides personalized course and career path suggestions, \
                resulting in a 60% boost in user engagement and a 35% increase in course \
                completion rates.",
            tech: &[
                "Java",
                "Spring Boot",
                "Machine Learning",
                "NLP",
                "Python",
                "REST APIs",
                "React",
            ],
            link: "https://github.com/K4LYAN",
        },
    ),
];

pub fn lookup(id: &str) -> Option<&'static ProjectRecord> {
    PROJECTS.iter().find(|(key, _)| *key == id).map(|(_, rec)| rec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_resolve() {
        assert_eq!(lookup("project1").map(|p| p.title), Some("Secure Web Portal"));
        assert_eq!(lookup("project2").map(|p| p.subtitle), Some("Guidance Platform"));
    }

    #[test]
    fn unknown_ids_do_not() {
        assert!(lookup("project3").is_none());
        assert!(lookup("").is_none());
        assert!(lookup("Project1").is_none());
    }
}
