//! XML 요소 트리 모듈
//!
//! quick-xml 이벤트를 읽어 변환 목록에 필요한 만큼의 간단한 요소 트리를 만듭니다.
//! 요소의 텍스트는 첫 번째 자식 요소 이전까지의 텍스트만 보관합니다.
//! 문서 인코딩은 BOM 또는 XML 선언(`encoding="GBK"` 등)을 따릅니다.

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// XML 요소
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// 태그 이름
    pub tag: String,
    /// 속성 목록 (문서 순서)
    pub attributes: Vec<(String, String)>,
    /// 첫 번째 자식 이전의 텍스트 (trim 하지 않음)
    pub text: String,
    /// 자식 요소 목록
    pub children: Vec<Element>,
}

impl Element {
    /// 속성 값 조회
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 주어진 태그 이름을 가진 직계 자식 요소
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// 앞뒤 공백을 제거한 텍스트 (비어 있으면 None)
    pub fn trimmed_text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// XML 문서를 파싱하여 루트 요소를 반환
///
/// # Arguments
/// * `content` - XML 문서 원본 바이트 (선언된 인코딩으로 디코딩)
///
/// # Returns
/// 루트 요소 (문서에 요소가 하나도 없으면 `None`) 또는 파싱 에러 메시지
pub fn parse_document(content: impl AsRef<[u8]>) -> std::result::Result<Option<Element>, String> {
    let content = content.as_ref();
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event_into(&mut buf);
        // XML 선언을 읽은 뒤에는 디코더가 바뀔 수 있음
        let decoder = reader.decoder();

        match event {
            Ok(Event::Start(e)) => {
                stack.push(start_element(&e, decoder)?);
            }
            Ok(Event::Empty(e)) => {
                let element = start_element(&e, decoder)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| "짝이 맞지 않는 닫는 태그".to_string())?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                push_text(&mut stack, &text)?;
            }
            Ok(Event::CData(e)) => {
                let text = decoder.decode(e.as_ref()).map_err(|e| e.to_string())?;
                push_text(&mut stack, &text)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!("{} (위치 {})", e, reader.buffer_position()));
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(format!("닫히지 않은 요소: <{}>", open.tag));
    }

    Ok(root)
}

/// 시작 태그로부터 빈 요소 생성
fn start_element(e: &BytesStart, decoder: Decoder) -> std::result::Result<Element, String> {
    let tag = decoder
        .decode(e.name().as_ref())
        .map_err(|e| e.to_string())?
        .to_string();
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = decoder
            .decode(attr.key.as_ref())
            .map_err(|e| e.to_string())?
            .to_string();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| e.to_string())?;
        attributes.push((key, value.to_string()));
    }

    Ok(Element {
        tag,
        attributes,
        ..Default::default()
    })
}

/// 완성된 요소를 부모에 붙이거나 루트로 설정
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> std::result::Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_some() => Err(format!("루트 요소 뒤에 다른 요소가 있습니다: <{}>", element.tag)),
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

/// 현재 열린 요소에 텍스트 추가
fn push_text(stack: &mut [Element], text: &str) -> std::result::Result<(), String> {
    match stack.last_mut() {
        // 첫 자식 이후의 텍스트는 버림
        Some(top) if top.children.is_empty() => {
            top.text.push_str(text);
            Ok(())
        }
        Some(_) => Ok(()),
        None if text.trim().is_empty() => Ok(()),
        None => Err(format!("루트 요소 밖의 텍스트: {}", text.trim())),
    }
}
