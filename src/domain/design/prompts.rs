//! プロンプトテンプレート
//!
//! リモートサービスへ送る指示文を組み立てる。説明取得は画像枚数で文面を切り替える

use super::value_objects::ProductType;

/// 説明取得のテンプレート種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescribeTemplate {
    /// 1枚の画像から説明する
    SingleView,
    /// 複数角度の画像を統合して1つの説明にする
    MultiView,
}

impl DescribeTemplate {
    pub fn for_image_count(image_count: usize) -> Self {
        if image_count > 1 {
            DescribeTemplate::MultiView
        } else {
            DescribeTemplate::SingleView
        }
    }
}

pub fn describe_prompt(product: ProductType, image_count: usize) -> String {
    match DescribeTemplate::for_image_count(image_count) {
        DescribeTemplate::SingleView => format!(
            "Analyze the following image of a {product}. Isolate the primary logo or design on it. \
             Describe the design in extensive detail, covering all elements, shapes, colors (with hex codes if possible), \
             text, fonts, and the overall style. The description should be clear and precise enough for a graphic designer \
             to recreate the design accurately. Do not describe the {product} itself, only the artwork on it."
        ),
        DescribeTemplate::MultiView => format!(
            "Analyze the following images, which show a single {product} from multiple angles. Synthesize the different \
             views to create ONE single, cohesive, and comprehensive description of the entire design that wraps around \
             the item. Describe the full design in extensive detail, covering all elements, shapes, colors (with hex codes \
             if possible), text, fonts, and the overall style. The description should be clear and precise enough for a \
             graphic designer to recreate the complete design. Do not describe the {product} itself, only the artwork on it."
        ),
    }
}

pub fn recreate_prompt(description: &str) -> String {
    format!(
        "A high-resolution, clean graphic design suitable for printing on merchandise. The design should be on a \
         solid white background for easy isolation. The design must accurately match the following description: \
         \"{description}\""
    )
}

pub fn extract_prompt(product: ProductType) -> String {
    format!(
        "From the attached image(s) of a {product}, precisely isolate the main design or logo. Remove the background \
         entirely, leaving only the design itself. The output image must have a transparent background. Do not add any \
         extra elements or text. Just return the isolated design."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_image_uses_single_view_template() {
        let prompt = describe_prompt(ProductType::Mug, 1);
        assert!(prompt.starts_with("Analyze the following image of a mug."));
        assert!(!prompt.contains("multiple angles"));
        assert!(prompt.ends_with("Do not describe the mug itself, only the artwork on it."));
    }

    #[test]
    fn test_multiple_images_use_synthesis_template() {
        let prompt = describe_prompt(ProductType::TShirt, 4);
        assert!(prompt.starts_with(
            "Analyze the following images, which show a single t-shirt from multiple angles."
        ));
        assert!(prompt.contains("Synthesize the different views"));
        assert_eq!(DescribeTemplate::for_image_count(2), DescribeTemplate::MultiView);
        assert_eq!(DescribeTemplate::for_image_count(1), DescribeTemplate::SingleView);
    }

    #[test]
    fn test_recreate_prompt_quotes_description() {
        let prompt = recreate_prompt("a red circle");
        assert!(prompt.ends_with("\"a red circle\""));
        assert!(prompt.contains("solid white background"));
    }

    #[test]
    fn test_extract_prompt_mentions_product() {
        let prompt = extract_prompt(ProductType::Item);
        assert!(prompt.starts_with("From the attached image(s) of a item,"));
        assert!(prompt.contains("transparent background"));
    }
}
