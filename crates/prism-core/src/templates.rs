//! Fixed rewrite templates, one per [`Technique`](crate::model::Technique).
//!
//! Each template is split around the point where the base prompt is inserted.

pub const FEW_SHOT_PREFIX: &str = r#"Example 1:
Input: Write a product description
Output: "Introducing the SmartWatch Pro - where cutting-edge technology meets timeless elegance..."

Example 2:
Input: Summarize this article
Output: "This article discusses three key points: 1) Market trends, 2) Consumer behavior, 3) Future predictions..."

Now, here's your task:
"#;

pub const FEW_SHOT_SUFFIX: &str =
    "\n\nPlease follow the same detailed, structured approach shown in the examples above.";

pub const CHAIN_OF_THOUGHT_SUFFIX: &str = r#"

Please think through this step-by-step:
1. First, analyze what the task is asking for
2. Then, identify the key components needed
3. Next, organize your thoughts logically
4. Finally, provide a comprehensive response

Walk me through your reasoning process before giving the final answer."#;

pub const STRUCTURED_OUTPUT_SUFFIX: &str = r#"

Please provide your response in the following structured format:

**Overview:**
[Brief summary]

**Key Points:**
- Point 1: [Details]
- Point 2: [Details]
- Point 3: [Details]

**Conclusion:**
[Final thoughts]

Ensure each section is clearly labeled and well-organized."#;

pub const ROLE_BASED_PREFIX: &str = "You are an expert professional with deep knowledge in this domain. You have years of experience and are known for providing insightful, accurate, and well-reasoned responses.\n\nTask: ";

pub const ROLE_BASED_SUFFIX: &str = r#"

As an expert, please provide a thorough response that demonstrates:
- Deep understanding of the subject matter
- Practical, actionable insights
- Clear explanations that are easy to follow
- Professional-level detail and accuracy"#;

pub const CONCISE_SUFFIX: &str = "\n\nBe direct and concise. Provide only the most important information without unnecessary elaboration. Focus on clarity and brevity.";

/// Sample configuration written by `prism init`.
pub const SAMPLE_CONFIG: &str = include_str!("../../../prism.yaml");
