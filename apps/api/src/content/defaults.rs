//! Built-in content served when the hosted store cannot provide a section.

use super::models::{About, Contact, Experience, Hero, Id, Project};

pub fn hero() -> Hero {
    Hero {
        title: "Software Developer".into(),
        subtitle: "Building scalable, maintainable systems with Java, Python, and modern React stacks."
            .into(),
        cta_github: "https://github.com".into(),
        cta_resume: String::new(),
        ..Default::default()
    }
}

pub fn about() -> About {
    About {
        content: "I'm a passionate full-stack engineer with expertise in building scalable systems and modern web applications."
            .into(),
        ..Default::default()
    }
}

pub fn contact() -> Contact {
    Contact {
        linkedin: Some("https://www.linkedin.com/".into()),
        github: Some("https://github.com/".into()),
        collaboration_text: Some(
            "Open for collaboration on projects and open source contributions.".into(),
        ),
        ..Default::default()
    }
}

pub fn experience() -> Vec<Experience> {
    vec![
        Experience {
            id: Some(Id::Int(2)),
            company: "LYKAS, Inc.".into(),
            role: "Software Engineer".into(),
            start_date: "2022-05".into(),
            end_date: None,
            description: "Built real-time chat and admin dashboards".into(),
            bullets: Some(vec!["Built real-time chat and admin dashboards.".into()]),
            tech: Some(vec!["Python".into(), "Django".into(), "Vue".into()]),
            ..Default::default()
        },
        Experience {
            id: Some(Id::Int(1)),
            company: "Digital Dreams Technology".into(),
            role: "Software Developer".into(),
            start_date: "2020-08".into(),
            end_date: Some("2022-04".into()),
            location: Some("Remote".into()),
            description: "Designed and implemented microservices architecture".into(),
            bullets: Some(vec![
                "Designed microservices (Java 11, Spring Boot).".into(),
                "Implemented CI/CD; reduced bugs.".into(),
            ]),
            tech: Some(vec![
                "Java".into(),
                "Spring Boot".into(),
                "AWS".into(),
                "SQL".into(),
            ]),
            ..Default::default()
        },
    ]
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: Some(Id::Int(1)),
            title: "RetailOps Pro".into(),
            slug: "retailops-pro".into(),
            description: "Inventory & order management platform.".into(),
            long_description: Some(
                "Built microservices for inventory, orders and invoices.".into(),
            ),
            tech_stack: vec![
                "Java".into(),
                "Spring Boot".into(),
                "AWS".into(),
                "React".into(),
            ],
            tags: Some(vec!["Full Stack".into()]),
            featured: Some(true),
            date: Some("2023-06-15".into()),
            ..Default::default()
        },
        Project {
            id: Some(Id::Int(2)),
            title: "LYKAS Chat".into(),
            slug: "lykas-chat".into(),
            description: "Real-time chat for advisory platform.".into(),
            tech_stack: vec!["Python".into(), "Django".into(), "Vue".into()],
            tags: Some(vec!["Realtime".into()]),
            featured: Some(false),
            date: Some("2023-01-10".into()),
            ..Default::default()
        },
    ]
}
