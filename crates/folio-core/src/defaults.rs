//! The compiled-in portfolio used on first run and whenever the stored copy
//! is stale.

use crate::{
  CURRENT_VERSION,
  document::{PortfolioDocument, Profile, Project, Technology},
};

/// Build the default document, stamped with [`CURRENT_VERSION`].
pub fn default_document() -> PortfolioDocument {
  PortfolioDocument {
    version:      CURRENT_VERSION.to_owned(),
    profile:      default_profile(),
    technologies: default_technologies(),
    projects:     default_projects(),
  }
}

pub fn default_profile() -> Profile {
  Profile {
    name:        Some("Alex Vercetti".into()),
    designation: Some("Senior Data Analyst".into()),
    bio:         Some(
      "I'm a data analyst with a passion for turning raw data into strategic \
       insights that drive business decisions. With expertise in Python, SQL, \
       and machine learning, I specialize in building predictive models, \
       automating data workflows, and creating compelling visualizations. My \
       approach combines technical rigor with clear communication, ensuring \
       that complex analyses translate into actionable recommendations for \
       stakeholders at all levels."
        .into(),
    ),
  }
}

pub fn default_technologies() -> Vec<Technology> {
  vec![
    Technology::new("Python", "Python"),
    Technology::new("SQL", "SQL"),
    Technology::new("Terminal", "Terminal"),
    Technology::new("ML/AI", "ML"),
    Technology::new("Tableau", "Tableau"),
    Technology::new("Excel", "Excel"),
    Technology::new("Power BI", "PowerBI"),
    Technology::new("R", "R"),
  ]
}

pub fn default_projects() -> Vec<Project> {
  vec![
    project(
      "1",
      "E-commerce Customer Churn Prediction",
      "Developed an end-to-end ML pipeline to identify high-risk customer \
       segments, reducing churn by 12% in the subsequent quarter through \
       targeted retention campaigns.",
      "https://github.com/alex/churn-prediction",
      "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=800&h=600&fit=crop",
      &[
        "Data ingestion and cleaning from multiple e-commerce sources",
        "Feature engineering (RFM value, purchase frequency, engagement metrics)",
        "Built and optimized Random Forest model achieving 87% accuracy",
        "Created a web-based deployment interface for real-time predictions",
        "Reported key drivers of churn to marketing team with actionable insights",
      ],
    ),
    project(
      "2",
      "Sales Performance Dashboard",
      "A comprehensive sales analytics dashboard that tracks KPIs, revenue \
       trends, and regional performance in real-time. Built with Tableau and \
       connected to live sales databases for dynamic insights.",
      "https://github.com/alex/sales-dashboard",
      "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=800&h=600&fit=crop",
      &[
        "Collected and cleaned sales data from multiple sources (SAP, Salesforce, Excel)",
        "Performed exploratory data analysis to identify key metrics and patterns",
        "Created interactive Tableau visualizations with drill-down capabilities",
        "Implemented automated monthly data refresh pipeline using Python ETL scripts",
        "Designed user-friendly interface enabling stakeholders to filter by region, product, and time period",
      ],
    ),
    project(
      "3",
      "Market Segmentation & Customer Insights",
      "Applied unsupervised learning techniques to segment 500K+ customers \
       into distinct personas, enabling targeted marketing campaigns that \
       increased conversion rates by 18% and improved customer lifetime value.",
      "https://github.com/alex/customer-segmentation",
      "https://images.unsplash.com/photo-1504868584819-f8e8b4b6d7e3?w=800&h=600&fit=crop",
      &[
        "Aggregated customer behavior data from CRM, transaction logs, and web analytics",
        "Applied K-means clustering and hierarchical clustering techniques",
        "Validated clusters using silhouette scores and business logic",
        "Created detailed customer personas with demographic and behavioral characteristics",
        "Delivered presentations to executive team with strategic recommendations for each segment",
      ],
    ),
  ]
}

fn project(
  id: &str,
  name: &str,
  description: &str,
  repository_url: &str,
  image_url: &str,
  key_steps: &[&str],
) -> Project {
  Project {
    id:             id.to_owned(),
    order:          id.parse().unwrap_or_default(),
    name:           name.to_owned(),
    description:    description.to_owned(),
    repository_url: Some(repository_url.to_owned()),
    image_url:      Some(image_url.to_owned()),
    key_steps:      key_steps.iter().map(|s| (*s).to_owned()).collect(),
  }
}
