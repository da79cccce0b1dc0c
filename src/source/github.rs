use super::IssueSource;
use crate::config::{FieldNames, GitHubSettings};
use crate::error::{Result, TrackError};
use crate::model::{Category, Issue, IssueState};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::cell::OnceCell;
use std::collections::HashMap;

const PROJECT_ITEMS_QUERY: &str = r#"
query($org: String!, $number: Int!, $first: Int!, $after: String,
      $category: String!, $workstream: String!, $milestone: String!, $target: String!) {
  organization(login: $org) {
    projectV2(number: $number) {
      items(first: $first, after: $after) {
        pageInfo { hasNextPage endCursor }
        nodes {
          id
          updatedAt
          category: fieldValueByName(name: $category) {
            ... on ProjectV2ItemFieldSingleSelectValue { name }
          }
          workstream: fieldValueByName(name: $workstream) {
            ... on ProjectV2ItemFieldSingleSelectValue { name }
          }
          milestone: fieldValueByName(name: $milestone) {
            ... on ProjectV2ItemFieldSingleSelectValue { name }
          }
          target: fieldValueByName(name: $target) {
            ... on ProjectV2ItemFieldDateValue { date }
          }
          content {
            ... on Issue {
              id
              resourcePath
              title
              state
              updatedAt
              trackedIssues(first: 100) {
                pageInfo { hasNextPage }
                nodes { id }
              }
            }
          }
        }
      }
    }
  }
}
"#;

const ISSUE_BODIES_QUERY: &str = r#"
query($ids: [ID!]!) {
  nodes(ids: $ids) {
    ... on Issue { id body }
  }
}
"#;

const SET_ISSUE_BODY_MUTATION: &str = r#"
mutation($id: ID!, $body: String!) {
  updateIssue(input: {id: $id, body: $body}) { issue { id } }
}
"#;

const MILESTONE_FIELD_QUERY: &str = r#"
query($org: String!, $number: Int!, $field: String!) {
  organization(login: $org) {
    projectV2(number: $number) {
      id
      field(name: $field) {
        ... on ProjectV2SingleSelectField { id options { id name } }
      }
    }
  }
}
"#;

const SET_FIELD_MUTATION: &str = r#"
mutation($project: ID!, $item: ID!, $field: ID!, $option: String!) {
  updateProjectV2ItemFieldValue(input: {
    projectId: $project, itemId: $item, fieldId: $field,
    value: {singleSelectOptionId: $option}
  }) { projectV2Item { id } }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OrganizationData<P> {
    organization: Option<ProjectData<P>>,
}

#[derive(Debug, Deserialize)]
struct ProjectData<P> {
    #[serde(rename = "projectV2")]
    project: Option<P>,
}

#[derive(Debug, Deserialize)]
struct ItemsProject {
    items: Connection<ItemNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
struct Connection<T> {
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<Option<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemNode {
    id: String,
    updated_at: Option<DateTime<Utc>>,
    category: Option<SingleSelectValue>,
    workstream: Option<SingleSelectValue>,
    milestone: Option<SingleSelectValue>,
    target: Option<DateValue>,
    content: Option<ContentNode>,
}

#[derive(Debug, Deserialize)]
struct SingleSelectValue {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateValue {
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentNode {
    id: Option<String>,
    resource_path: Option<String>,
    title: Option<String>,
    state: Option<IssueState>,
    updated_at: Option<DateTime<Utc>>,
    tracked_issues: Option<IdNodes>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdNodes {
    page_info: Option<TrackedPageInfo>,
    #[serde(default)]
    nodes: Vec<Option<IdNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackedPageInfo {
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct IdNode {
    id: String,
}

#[derive(Debug, Deserialize)]
struct BodiesData {
    #[serde(default)]
    nodes: Vec<Option<BodyNode>>,
}

#[derive(Debug, Deserialize)]
struct BodyNode {
    id: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FieldProject {
    id: String,
    field: Option<SingleSelectField>,
}

#[derive(Debug, Deserialize)]
struct SingleSelectField {
    id: Option<String>,
    #[serde(default)]
    options: Vec<FieldOption>,
}

#[derive(Debug, Deserialize)]
struct FieldOption {
    id: String,
    name: String,
}

/// Project and field ids needed to write the milestone field.
#[derive(Debug)]
struct MilestoneField {
    project_id: String,
    field_id: String,
    /// Option name -> option id.
    options: HashMap<String, String>,
}

/// Blocking client for the GitHub GraphQL API.
pub struct GitHubSource {
    client: reqwest::blocking::Client,
    token: String,
    settings: GitHubSettings,
    fields: FieldNames,
    milestone_field: OnceCell<MilestoneField>,
}

impl GitHubSource {
    pub fn new(settings: GitHubSettings, fields: FieldNames, token: String) -> Result<Self> {
        // reqwest is built without a default crypto provider.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let client = reqwest::blocking::Client::builder()
            .user_agent(format!("trackpm/{}", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            token,
            settings,
            fields,
            milestone_field: OnceCell::new(),
        })
    }

    fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TrackError::Transport(
                "GitHub rejected the access token".to_string(),
            ));
        }
        let response: GraphQlResponse<T> = response.error_for_status()?.json()?;
        into_data(response)
    }

    fn milestone_field(&self) -> Result<&MilestoneField> {
        if let Some(field) = self.milestone_field.get() {
            return Ok(field);
        }

        let data: OrganizationData<FieldProject> = self.graphql(
            MILESTONE_FIELD_QUERY,
            json!({
                "org": self.settings.organization,
                "number": self.settings.project_number,
                "field": self.fields.project_milestone,
            }),
        )?;
        let project = project_of(data, &self.settings)?;
        let field = project.field.ok_or_else(|| {
            TrackError::GraphQl(format!(
                "Project has no field named '{}'",
                self.fields.project_milestone
            ))
        })?;
        let field_id = field.id.ok_or_else(|| {
            TrackError::GraphQl(format!(
                "Field '{}' is not a single select field",
                self.fields.project_milestone
            ))
        })?;

        let resolved = MilestoneField {
            project_id: project.id,
            field_id,
            options: field.options.into_iter().map(|o| (o.name, o.id)).collect(),
        };
        tracing::debug!(options = resolved.options.len(), "Resolved milestone field");
        Ok(self.milestone_field.get_or_init(|| resolved))
    }
}

fn into_data<T>(response: GraphQlResponse<T>) -> Result<T> {
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(TrackError::GraphQl(messages.join("; ")));
    }
    response
        .data
        .ok_or_else(|| TrackError::GraphQl("Response contained no data".to_string()))
}

fn project_of<P>(data: OrganizationData<P>, settings: &GitHubSettings) -> Result<P> {
    data.organization
        .and_then(|o| o.project)
        .ok_or_else(|| {
            TrackError::NotFound(format!(
                "project {} in organization {}",
                settings.project_number, settings.organization
            ))
        })
}

/// Turn a project item into an issue; items that are not issues are dropped.
fn into_issue(node: ItemNode) -> Option<Issue> {
    let content = node.content?;
    let (Some(id), Some(resource_path)) = (content.id, content.resource_path) else {
        tracing::debug!(item = %node.id, "Skipping project item that is not an issue");
        return None;
    };

    let category_name = node.category.and_then(|c| c.name);
    let category = Category::from_field(category_name.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(path = %resource_path, error = %e, "Unknown category");
        Category::NoCategory
    });

    let tracked_issues = content
        .tracked_issues
        .map(|t| tracked_ids(&resource_path, t))
        .unwrap_or_default();

    Some(Issue {
        id,
        item_id: Some(node.id),
        resource_path,
        category,
        state: content.state.unwrap_or_default(),
        title: content.title,
        body: None,
        workstream: node.workstream.and_then(|w| w.name),
        project_milestone: node.milestone.and_then(|m| m.name),
        target_date: node.target.and_then(|t| t.date),
        updated_at: content.updated_at.or(node.updated_at),
        tracked_issues,
        tracked_by_issues: Vec::new(),
    })
}

/// Only the first page of tracked issues is fetched.
fn tracked_ids(resource_path: &str, tracked: IdNodes) -> Vec<String> {
    if tracked.page_info.is_some_and(|p| p.has_next_page) {
        tracing::warn!(
            path = %resource_path,
            "Issue tracks more than 100 issues; only the first 100 are linked"
        );
    }
    tracked.nodes.into_iter().flatten().map(|n| n.id).collect()
}

impl IssueSource for GitHubSource {
    fn fetch_all_project_items(&self) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let data: OrganizationData<ItemsProject> = self.graphql(
                PROJECT_ITEMS_QUERY,
                json!({
                    "org": self.settings.organization,
                    "number": self.settings.project_number,
                    "first": self.settings.page_size,
                    "after": after,
                    "category": self.fields.category,
                    "workstream": self.fields.workstream,
                    "milestone": self.fields.project_milestone,
                    "target": self.fields.target_date,
                }),
            )?;
            let items = project_of(data, &self.settings)?.items;
            issues.extend(items.nodes.into_iter().flatten().filter_map(into_issue));
            tracing::debug!(count = issues.len(), "Fetched page of project items");

            match (items.page_info.has_next_page, items.page_info.end_cursor) {
                (true, Some(cursor)) => after = Some(cursor),
                _ => break,
            }
        }

        Ok(issues)
    }

    fn fetch_bodies(&self, issues: &mut [Issue]) -> Result<()> {
        for chunk in issues.chunks_mut(self.settings.chunk_size) {
            let ids: Vec<&str> = chunk.iter().map(|i| i.id.as_str()).collect();
            let data: BodiesData = self.graphql(ISSUE_BODIES_QUERY, json!({ "ids": ids }))?;

            let bodies: HashMap<String, Option<String>> = data
                .nodes
                .into_iter()
                .flatten()
                .filter_map(|n| n.id.map(|id| (id, n.body)))
                .collect();
            for issue in chunk.iter_mut() {
                match bodies.get(&issue.id) {
                    Some(body) => issue.body = body.clone(),
                    None => tracing::warn!(path = %issue.resource_path, "No body returned for issue"),
                }
            }
        }
        Ok(())
    }

    fn commit_body(&self, issue_id: &str, body: &str) -> Result<()> {
        let _: Value = self.graphql(
            SET_ISSUE_BODY_MUTATION,
            json!({ "id": issue_id, "body": body }),
        )?;
        tracing::info!(id = %issue_id, "Updated issue body");
        Ok(())
    }

    fn commit_milestone_field(&self, item_id: &str, milestone: &str) -> Result<()> {
        let field = self.milestone_field()?;
        let option = field.options.get(milestone).ok_or_else(|| {
            TrackError::NotFound(format!("milestone option '{}'", milestone))
        })?;

        let _: Value = self.graphql(
            SET_FIELD_MUTATION,
            json!({
                "project": field.project_id,
                "item": item_id,
                "field": field.field_id,
                "option": option,
            }),
        )?;
        tracing::info!(item = %item_id, milestone = %milestone, "Updated milestone field");
        Ok(())
    }
}
